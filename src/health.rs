//! Health Check Handler
//!
//! `/health` reports service identity, uptime and database reachability.
//! The endpoint answers 200 while the database answers and 503 otherwise.

use crate::postgres::health_check as database_health_check;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use serde::Serialize;
use std::time::{Duration, Instant, SystemTime};

/// Service status enumeration
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

/// Status of one dependency
#[derive(Debug, Clone, Serialize)]
pub struct DependencyStatus {
    pub name: String,
    pub status: ServiceStatus,
    pub response_time_ms: u64,
    pub error: Option<String>,
}

/// Body of the `/health` response
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: ServiceStatus,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since startup
    pub uptime: u64,
    pub database: DependencyStatus,
}

/// Shared state of the health endpoint
#[derive(Clone)]
pub struct HealthState {
    pub start_time: SystemTime,
    pub version: String,
    pub service_name: String,
    pub pool: Pool,
}

impl HealthState {
    pub fn new(service_name: impl Into<String>, version: impl Into<String>, pool: Pool) -> Self {
        Self {
            start_time: SystemTime::now(),
            version: version.into(),
            service_name: service_name.into(),
            pool,
        }
    }

    pub fn uptime(&self) -> u64 {
        self.start_time.elapsed().unwrap_or(Duration::from_secs(0)).as_secs()
    }
}

async fn check_database(pool: &Pool) -> DependencyStatus {
    let started = Instant::now();
    let result = database_health_check(pool).await;
    let response_time_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(()) => DependencyStatus {
            name: "postgresql".to_string(),
            status: ServiceStatus::Healthy,
            response_time_ms,
            error: None,
        },
        Err(error) => {
            log::warn!("Health check: {error}");
            DependencyStatus {
                name: "postgresql".to_string(),
                status: ServiceStatus::Unhealthy,
                response_time_ms,
                error: Some(error),
            }
        },
    }
}

/// Health endpoint
pub async fn health(state: web::Data<HealthState>) -> HttpResponse {
    let database = check_database(&state.pool).await;
    let status = database.status;

    let body = HealthStatus {
        status,
        service: state.service_name.clone(),
        version: state.version.clone(),
        timestamp: Utc::now(),
        uptime: state.uptime(),
        database,
    };

    match status {
        ServiceStatus::Healthy => HttpResponse::Ok().json(body),
        ServiceStatus::Unhealthy => HttpResponse::ServiceUnavailable().json(body),
    }
}

/// Register `/health`
pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
