//! Password security and cryptography utilities.
//!
//! Provides functions for secure password handling:
//! - Per-user salt generation
//! - Deterministic Argon2id digest of plaintext + stored salt
//! - Password verification against a stored digest

use super::generator::generate_salt;
use crate::types::PasswordConfig;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Password assigned by an administrator reset
pub const DEFAULT_PASSWORD: &str = "111111";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingError(String),

    #[error("Invalid salt: {0}")]
    InvalidSalt(String),

    #[error("Failed to verify password: {0}")]
    VerificationError(String),

    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}

/// Credential hashing seam used by the user service
pub trait CredentialHasher: Send + Sync {
    /// Fresh random salt for a new user
    fn generate_salt(&self) -> String;

    /// Digest of `password` under `salt`; the same inputs always yield the same digest
    fn hash(&self, password: &str, salt: &str) -> Result<String, PasswordError>;

    /// Check `password` against a stored digest
    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError>;
}

/// Argon2id implementation of [`CredentialHasher`]
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new(config: &PasswordConfig) -> Result<Self, PasswordError> {
        let params =
            Params::new(config.memory_kib, config.iterations, config.parallelism, None)
                .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialHasher for Argon2Hasher {
    fn generate_salt(&self) -> String {
        generate_salt()
    }

    fn hash(&self, password: &str, salt: &str) -> Result<String, PasswordError> {
        let salt = SaltString::from_b64(salt).map_err(|e| PasswordError::InvalidSalt(e.to_string()))?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(digest).map_err(|e| PasswordError::VerificationError(e.to_string()))?;

        Ok(self.argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }
}
