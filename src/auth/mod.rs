//! Authentication support
//!
//! - Password salting and hashing for stored credentials
//! - Session token lookup for the current administrator

pub mod password;
pub mod session;

pub use password::{Argon2Hasher, CredentialHasher, PasswordError, DEFAULT_PASSWORD};
pub use session::{PgSessionStore, SessionError, SessionStore, SessionUser};
