//! User Service Module
//!
//! This module provides the business logic for user management operations.
//! It sits between the request handlers and the repository, applying validation
//! and credential handling. Each operation issues at most one read and one write.

use crate::auth::password::{CredentialHasher, DEFAULT_PASSWORD};
use crate::user::{
    dto::{UserAddForm, UserQuery},
    error::UserError,
    models::{User, UserChanges, UserRole, UserStatus},
    repository::UserRepository,
};
use std::sync::Arc;

/// Service for managing user-related operations
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    /// Creates a new UserService with the given dependencies
    pub fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            repo,
            hasher,
        }
    }

    /// Lists users matching the filter
    pub async fn list(&self, query: &UserQuery) -> Result<Vec<User>, UserError> {
        self.repo.list(query).await
    }

    /// Gets a user by id
    pub async fn get_user(&self, id: i64) -> Result<User, UserError> {
        self.repo.get_user_by_id(id).await?.ok_or(UserError::NotFound)
    }

    /// Gets a user together with its role
    pub async fn get_user_role(&self, id: i64) -> Result<UserRole, UserError> {
        self.repo.get_user_role(id).await?.ok_or(UserError::NotFound)
    }

    /// Registers a new user with a fresh salt
    pub async fn add_user(&self, form: UserAddForm) -> Result<i64, UserError> {
        form.validate()?;

        let salt = self.hasher.generate_salt();
        let digest = self.hasher.hash(&form.password, &salt)?;
        let new_user = form.into_new_user(digest, salt)?;

        let id = self.repo.save(&new_user).await?;
        log::info!("Created user {} (id {id})", new_user.account);

        Ok(id)
    }

    /// Updates the profile fields of a user
    pub async fn edit_user(&self, id: i64, changes: UserChanges) -> Result<(), UserError> {
        self.repo.update(id, &changes).await?;
        log::info!("Updated profile of user {id}");
        Ok(())
    }

    /// Deletes a user
    pub async fn delete_user(&self, id: i64) -> Result<(), UserError> {
        self.repo.delete(id).await?;
        log::info!("Deleted user {id}");
        Ok(())
    }

    /// Resets the password to the default one, keeping the user's salt
    pub async fn reset_password(&self, id: i64) -> Result<(), UserError> {
        let user = self.get_user(id).await?;
        let digest = self.hasher.hash(DEFAULT_PASSWORD, &user.salt)?;

        self.repo
            .update(
                id,
                &UserChanges {
                    password: Some(digest),
                    ..Default::default()
                },
            )
            .await?;

        log::info!("Reset password of user {id}");
        Ok(())
    }

    /// Replaces the role list of a user; role ids are not checked
    pub async fn set_role(&self, id: i64, role_ids: String) -> Result<(), UserError> {
        self.repo
            .update(
                id,
                &UserChanges {
                    role_id: Some(role_ids),
                    ..Default::default()
                },
            )
            .await?;

        log::info!("Assigned roles to user {id}");
        Ok(())
    }

    /// Freezes a user
    pub async fn freeze(&self, id: i64) -> Result<(), UserError> {
        self.set_status(id, UserStatus::Frozen).await
    }

    /// Reactivates a user; a no-op for active users
    pub async fn unfreeze(&self, id: i64) -> Result<(), UserError> {
        self.set_status(id, UserStatus::Active).await
    }

    async fn set_status(&self, id: i64, status: UserStatus) -> Result<(), UserError> {
        self.repo
            .update(
                id,
                &UserChanges {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await?;

        log::info!("User {id} is now {status}");
        Ok(())
    }
}
