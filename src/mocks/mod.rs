//! In-memory collaborators for tests and local development
//!
//! `InMemoryUserRepository` mirrors `PgUserRepository` semantics, including
//! soft deletion, and counts calls so tests can assert that rejected requests
//! never reach persistence.

use crate::auth::password::Argon2Hasher;
use crate::auth::session::{SessionError, SessionStore};
use crate::state::AppState;
use crate::templates::MiniJinjaEngine;
use crate::types::PasswordConfig;
use crate::user::dto::UserQuery;
use crate::user::error::UserError;
use crate::user::models::{NewUser, Role, User, UserChanges, UserRole, UserStatus};
use crate::user::repository::UserRepository;
use crate::user::service::UserService;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Session cookie name used by `test_state`
pub const TEST_SESSION_COOKIE: &str = "admin_session";

#[derive(Default)]
struct Store {
    next_id: i64,
    users: HashMap<i64, User>,
    roles: HashMap<i64, Role>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    store: Mutex<Store>,
    failure: Mutex<Option<String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a role visible to `get_user_role`
    pub fn insert_role(&self, id: i64, name: &str) {
        let mut store = self.store.lock().unwrap();
        store.roles.insert(
            id,
            Role {
                id,
                name: name.to_string(),
            },
        );
    }

    /// Makes every following call fail with a database error
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Number of read calls so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of write calls so far, failed ones included
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw row access, deleted users included
    pub fn stored(&self, id: i64) -> Option<User> {
        self.store.lock().unwrap().users.get(&id).cloned()
    }

    fn check_failure(&self) -> Result<(), UserError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(UserError::Database(message.clone())),
            None => Ok(()),
        }
    }

    fn read(&self) -> Result<(), UserError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_failure()
    }

    fn write(&self) -> Result<(), UserError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_failure()
    }
}

fn visible(user: &User) -> bool {
    user.status != UserStatus::Deleted
}

fn matches_query(user: &User, query: &UserQuery) -> bool {
    if let Some(name) = &query.name {
        let needle = name.to_lowercase();
        if !user.name.to_lowercase().contains(&needle) && !user.account.to_lowercase().contains(&needle) {
            return false;
        }
    }

    let created = user.create_time.date_naive();
    query.created_from.map_or(true, |from| created >= from)
        && query.created_to.map_or(true, |to| created <= to)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, UserError> {
        self.read()?;
        let store = self.store.lock().unwrap();

        let mut users: Vec<User> = store
            .users
            .values()
            .filter(|user| visible(user) && matches_query(user, query))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.create_time.cmp(&a.create_time).then(b.id.cmp(&a.id)));

        Ok(users)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, UserError> {
        self.read()?;
        let store = self.store.lock().unwrap();
        Ok(store.users.get(&id).filter(|user| visible(user)).cloned())
    }

    async fn get_user_role(&self, id: i64) -> Result<Option<UserRole>, UserError> {
        self.read()?;
        let store = self.store.lock().unwrap();

        let Some(user) = store.users.get(&id).filter(|user| visible(user)).cloned() else {
            return Ok(None);
        };
        let role = user.primary_role_id().and_then(|role_id| store.roles.get(&role_id)).cloned();

        Ok(Some(UserRole {
            user,
            role,
        }))
    }

    async fn save(&self, user: &NewUser) -> Result<i64, UserError> {
        self.write()?;
        let mut store = self.store.lock().unwrap();

        store.next_id += 1;
        let id = store.next_id;
        store.users.insert(
            id,
            User {
                id,
                account: user.account.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
                sex: user.sex,
                password: user.password.clone(),
                salt: user.salt.clone(),
                status: UserStatus::Active,
                role_id: String::new(),
                create_time: Utc::now(),
            },
        );

        Ok(id)
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<(), UserError> {
        self.write()?;
        if changes.is_empty() {
            return Ok(());
        }

        let mut store = self.store.lock().unwrap();
        let user = store.users.get_mut(&id).filter(|user| visible(user)).ok_or(UserError::NotFound)?;

        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(sex) = changes.sex {
            user.sex = sex;
        }
        if let Some(password) = &changes.password {
            user.password = password.clone();
        }
        if let Some(status) = changes.status {
            user.status = status;
        }
        if let Some(role_id) = &changes.role_id {
            user.role_id = role_id.clone();
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), UserError> {
        self.write()?;
        let mut store = self.store.lock().unwrap();

        let user = store.users.get_mut(&id).filter(|user| visible(user)).ok_or(UserError::NotFound)?;
        user.status = UserStatus::Deleted;

        Ok(())
    }
}

/// Token to user id map standing in for the `user_sessions` table
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, i64>>,
    failure: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: &str, user_id: i64) {
        self.sessions.lock().unwrap().insert(token.to_string(), user_id);
    }

    /// Makes every following lookup fail
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn user_id(&self, token: &str) -> Result<Option<i64>, SessionError> {
        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(SessionError::Store(message.clone()));
        }
        Ok(self.sessions.lock().unwrap().get(token).copied())
    }
}

/// Argon2 with minimal cost, for tests only
pub fn light_hasher() -> Argon2Hasher {
    Argon2Hasher::new(&PasswordConfig {
        memory_kib: 256,
        iterations: 1,
        parallelism: 1,
    })
    .expect("light argon2 params are valid")
}

/// Application state over the given repository, an empty session store and the embedded views
pub fn test_state(repo: Arc<dyn UserRepository>) -> AppState {
    AppState {
        users: Arc::new(UserService::new(repo, Arc::new(light_hasher()))),
        sessions: Arc::new(MemorySessionStore::new()),
        templates: Arc::new(MiniJinjaEngine::new().expect("embedded templates parse")),
        session_cookie: TEST_SESSION_COOKIE.to_string(),
    }
}
