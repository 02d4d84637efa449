//! Credential handling: salt generation and password digests.

pub mod generator;
pub mod security;

pub use security::{Argon2Hasher, CredentialHasher, PasswordError, DEFAULT_PASSWORD};
