//! User Repository Module
//!
//! This module defines the repository interface and the PostgreSQL implementation
//! for user data persistence. Rows whose status is `Deleted` are invisible to
//! every operation.

use super::dto::UserQuery;
use super::models::{NewUser, Role, Sex, User, UserChanges, UserRole, UserStatus};
use crate::user::error::UserError;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

/// Repository trait defining operations for user data persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Lists visible users matching the filter, newest first
    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, UserError>;

    /// Finds a user by its id
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, UserError>;

    /// Finds a user together with the role named by its first role id
    async fn get_user_role(&self, id: i64) -> Result<Option<UserRole>, UserError>;

    /// Inserts a new active user and returns its id
    async fn save(&self, user: &NewUser) -> Result<i64, UserError>;

    /// Writes the `Some` fields of `changes`; `NotFound` when no visible row matched
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<(), UserError>;

    /// Marks a user deleted
    async fn delete(&self, id: i64) -> Result<(), UserError>;
}

const USER_COLUMNS: &str =
    "u.id, u.account, u.name, u.email, u.sex, u.password, u.salt, u.status, u.role_id, u.create_time";

/// PostgreSQL implementation of the UserRepository
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    /// Creates a new PostgreSQL user repository
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
        }
    }
}

/// Escapes `LIKE` metacharacters so the needle matches literally under `ESCAPE '\'`
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn user_from_row(row: &Row) -> Result<User, UserError> {
    let status_code: i16 = row.try_get("status")?;
    let status = UserStatus::from_code(status_code)
        .ok_or_else(|| UserError::Database(format!("unknown user status {status_code}")))?;

    Ok(User {
        id: row.try_get("id")?,
        account: row.try_get("account")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        sex: Sex::from_code(row.try_get("sex")?),
        password: row.try_get("password")?,
        salt: row.try_get("salt")?,
        status,
        role_id: row.try_get("role_id")?,
        create_time: row.try_get("create_time")?,
    })
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, UserError> {
        let deleted = UserStatus::Deleted.code();
        let name_pattern = query.name.as_deref().map(|name| format!("%{}%", escape_like(name)));

        let mut conditions = vec!["u.status <> $1".to_string()];
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();
        params.push(&deleted);

        if let Some(pattern) = &name_pattern {
            params.push(pattern);
            conditions.push(format!(
                "(u.name ILIKE ${0} ESCAPE '\\' OR u.account ILIKE ${0} ESCAPE '\\')",
                params.len()
            ));
        }
        if let Some(from) = &query.created_from {
            params.push(from);
            conditions.push(format!("u.create_time::date >= ${}", params.len()));
        }
        if let Some(to) = &query.created_to {
            params.push(to);
            conditions.push(format!("u.create_time::date <= ${}", params.len()));
        }

        let sql = format!(
            "SELECT {USER_COLUMNS} FROM sys_user u WHERE {} ORDER BY u.create_time DESC, u.id DESC",
            conditions.join(" AND ")
        );

        let client = self.pool.get().await?;
        let rows = client.query(sql.as_str(), &params).await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, UserError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM sys_user u WHERE u.id = $1 AND u.status <> $2");

        let client = self.pool.get().await?;
        let row = client.query_opt(sql.as_str(), &[&id, &UserStatus::Deleted.code()]).await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_user_role(&self, id: i64) -> Result<Option<UserRole>, UserError> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, r.id AS role_pk, r.name AS role_name
             FROM sys_user u
             LEFT JOIN sys_role r
               ON r.id = CASE WHEN trim(split_part(u.role_id, ',', 1)) ~ '^[0-9]+$'
                              THEN trim(split_part(u.role_id, ',', 1))::bigint END
             WHERE u.id = $1 AND u.status <> $2"
        );

        let client = self.pool.get().await?;
        let row = client.query_opt(sql.as_str(), &[&id, &UserStatus::Deleted.code()]).await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let role_id: Option<i64> = row.try_get("role_pk")?;
        let role_name: Option<String> = row.try_get("role_name")?;
        let role = match (role_id, role_name) {
            (Some(id), Some(name)) => Some(Role {
                id,
                name,
            }),
            _ => None,
        };

        Ok(Some(UserRole {
            user: user_from_row(&row)?,
            role,
        }))
    }

    async fn save(&self, user: &NewUser) -> Result<i64, UserError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "INSERT INTO sys_user (account, name, email, sex, password, salt, status, role_id)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, '')
                 RETURNING id",
                &[
                    &user.account,
                    &user.name,
                    &user.email,
                    &user.sex.code(),
                    &user.password,
                    &user.salt,
                    &UserStatus::Active.code(),
                ],
            )
            .await?;

        Ok(row.try_get("id")?)
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<(), UserError> {
        if changes.is_empty() {
            return Ok(());
        }

        let sex = changes.sex.map(Sex::code);
        let status = changes.status.map(UserStatus::code);
        let deleted = UserStatus::Deleted.code();

        let mut assignments: Vec<String> = Vec::new();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

        let fields: [(&str, Option<&(dyn ToSql + Sync)>); 6] = [
            ("name", changes.name.as_ref().map(|v| v as &(dyn ToSql + Sync))),
            ("email", changes.email.as_ref().map(|v| v as &(dyn ToSql + Sync))),
            ("sex", sex.as_ref().map(|v| v as &(dyn ToSql + Sync))),
            ("password", changes.password.as_ref().map(|v| v as &(dyn ToSql + Sync))),
            ("status", status.as_ref().map(|v| v as &(dyn ToSql + Sync))),
            ("role_id", changes.role_id.as_ref().map(|v| v as &(dyn ToSql + Sync))),
        ];
        for (column, value) in fields {
            if let Some(value) = value {
                params.push(value);
                assignments.push(format!("{column} = ${}", params.len()));
            }
        }

        params.push(&id);
        let id_param = params.len();
        params.push(&deleted);
        let deleted_param = params.len();

        let sql = format!(
            "UPDATE sys_user SET {} WHERE id = ${id_param} AND status <> ${deleted_param}",
            assignments.join(", ")
        );

        let client = self.pool.get().await?;
        let updated = client.execute(sql.as_str(), &params).await?;
        if updated == 0 {
            return Err(UserError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), UserError> {
        let client = self.pool.get().await?;
        let updated = client
            .execute(
                "UPDATE sys_user SET status = $1 WHERE id = $2 AND status <> $1",
                &[&UserStatus::Deleted.code(), &id],
            )
            .await?;

        if updated == 0 {
            return Err(UserError::NotFound);
        }

        Ok(())
    }
}
