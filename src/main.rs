use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use admin_panel::auth::{Argon2Hasher, PgSessionStore};
use admin_panel::config::load_config;
use admin_panel::health::{configure_health, HealthState};
use admin_panel::postgres::{create_pool, ensure_schema};
use admin_panel::templates::MiniJinjaEngine;
use admin_panel::types::{AppConfig, StartupError};
use admin_panel::user::{configure_user_routes, PgUserRepository, UserService};
use admin_panel::{AppState, SERVICE_NAME, VERSION};
use std::sync::Arc;

fn build_cors(origins: &[String]) -> Cors {
    if origins.iter().any(|origin| origin == "*") {
        return Cors::permissive();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST"])
        .supports_credentials()
        .max_age(3600)
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    log::info!("Connecting to {}", config.database.masked_url());
    let pool = create_pool(&config.database)?;
    if config.database.auto_migrate {
        ensure_schema(&pool).await?;
    }

    let hasher = Argon2Hasher::new(&config.password).map_err(|e| StartupError::Password(e.to_string()))?;
    let templates = MiniJinjaEngine::new().map_err(|e| StartupError::Template(e.to_string()))?;

    let users = UserService::new(Arc::new(PgUserRepository::new(pool.clone())), Arc::new(hasher));
    let state = web::Data::new(AppState::new(
        Arc::new(users),
        Arc::new(PgSessionStore::new(pool.clone())),
        Arc::new(templates),
        config.session.cookie_name.clone(),
    ));
    let health_state = web::Data::new(HealthState::new(SERVICE_NAME, VERSION, pool));

    let origins = config.cors_origins();
    let bind_address = config.bind_address();
    log::info!("Starting {SERVICE_NAME} v{VERSION} on {bind_address}");

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&origins))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(health_state.clone())
            .configure(configure_health)
            .service(configure_user_routes())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .map_err(|e| StartupError::ServerBind(format!("{bind_address}: {e}")))?
        .run()
        .await
        .map_err(|e| StartupError::ServerBind(e.to_string()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            env_logger::init();
            log::error!("{e}");
            std::process::exit(1);
        },
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    if let Err(e) = run(config).await {
        log::error!("{e}");
        std::process::exit(1);
    }

    Ok(())
}
