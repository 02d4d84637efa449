//! User domain models
//!
//! Core user models are aligned with the `sys_user` / `sys_role` schema.
//! Status and sex are stored as SMALLINT codes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter of the role id list stored on a user
pub const ROLE_ID_SEPARATOR: char = ',';

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Frozen,
    /// Set by delete; such rows are invisible to reads and updates
    Deleted,
}

impl UserStatus {
    pub fn code(self) -> i16 {
        match self {
            UserStatus::Active => 1,
            UserStatus::Frozen => 2,
            UserStatus::Deleted => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(UserStatus::Active),
            2 => Some(UserStatus::Frozen),
            3 => Some(UserStatus::Deleted),
            _ => None,
        }
    }
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Active
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Frozen => write!(f, "frozen"),
            UserStatus::Deleted => write!(f, "deleted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Unknown,
    Male,
    Female,
}

impl Sex {
    pub fn code(self) -> i16 {
        match self {
            Sex::Unknown => 0,
            Sex::Male => 1,
            Sex::Female => 2,
        }
    }

    /// Unrecognised codes map to `Unknown`
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => Sex::Male,
            2 => Sex::Female,
            _ => Sex::Unknown,
        }
    }
}

impl Default for Sex {
    fn default() -> Self {
        Sex::Unknown
    }
}

/// User record
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub account: String,
    pub name: String,
    pub email: String,
    pub sex: Sex,

    #[serde(skip_serializing)]
    pub password: String,

    #[serde(skip_serializing)]
    pub salt: String,

    pub status: UserStatus,
    /// Comma separated role ids
    pub role_id: String,
    pub create_time: DateTime<Utc>,
}

impl User {
    /// Id of the first entry of the role list, the one shown as the user's role
    pub fn primary_role_id(&self) -> Option<i64> {
        self.role_id.split(ROLE_ID_SEPARATOR).next().and_then(|id| id.trim().parse().ok())
    }
}

/// Values for a user about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub account: String,
    pub name: String,
    pub email: String,
    pub sex: Sex,
    pub password: String,
    pub salt: String,
}

/// Partial update; only `Some` fields are written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub sex: Option<Sex>,
    pub password: Option<String>,
    pub status: Option<UserStatus>,
    pub role_id: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        *self == UserChanges::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

/// A user paired with the role referenced by the first id of its role list
#[derive(Debug, Clone, Serialize)]
pub struct UserRole {
    pub user: User,
    pub role: Option<Role>,
}

impl UserRole {
    /// Role name, empty when the user has no resolvable role
    pub fn role_name(&self) -> &str {
        self.role.as_ref().map(|role| role.name.as_str()).unwrap_or_default()
    }
}
