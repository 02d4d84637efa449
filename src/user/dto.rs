//! User forms
//!
//! Request-scoped forms bound from urlencoded bodies or query strings. Every
//! field defaults to empty so a missing field is reported by validation rather
//! than by the deserializer.

use crate::user::error::UserError;
use crate::user::models::{NewUser, Sex, UserChanges};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a required integer identifier
pub fn parse_id(raw: &str) -> Result<i64, UserError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UserError::invalid_parameter());
    }

    raw.parse::<i64>().map_err(|e| UserError::InvalidParameter(e.to_string()))
}

fn require(field: &str, value: &str) -> Result<(), UserError> {
    if value.trim().is_empty() {
        return Err(UserError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), UserError> {
    if !email.is_empty() && !EMAIL_REGEX.is_match(email) {
        return Err(UserError::Validation("invalid email format".to_string()));
    }
    Ok(())
}

/// Blank means "not given"; anything else must be a numeric sex code
fn parse_sex(raw: &str) -> Result<Option<Sex>, UserError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<i16>()
        .map(|code| Some(Sex::from_code(code)))
        .map_err(|e| UserError::InvalidParameter(format!("sex: {e}")))
}

fn parse_date(field: &str, value: &str) -> Result<Option<NaiveDate>, UserError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|e| UserError::InvalidParameter(format!("{field}: {e}")))
}

/// List filter as submitted by the user table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserFilter {
    /// Matches name or account, case-insensitive substring
    pub name: String,
    #[serde(rename = "beginTime")]
    pub begin_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
}

/// Validated list filter handed to the repository
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserQuery {
    pub name: Option<String>,
    /// Inclusive lower bound on creation date
    pub created_from: Option<NaiveDate>,
    /// Inclusive upper bound on creation date
    pub created_to: Option<NaiveDate>,
}

impl UserFilter {
    pub fn to_query(&self) -> Result<UserQuery, UserError> {
        let name = self.name.trim();

        Ok(UserQuery {
            name: (!name.is_empty()).then(|| name.to_string()),
            created_from: parse_date("beginTime", &self.begin_time)?,
            created_to: parse_date("endTime", &self.end_time)?,
        })
    }
}

/// Registration form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserAddForm {
    pub account: String,
    pub name: String,
    pub email: String,
    pub sex: String,
    pub password: String,
    #[serde(rename = "rePassword")]
    pub re_password: String,
}

impl UserAddForm {
    /// Required fields, email format, then byte-for-byte password confirmation
    pub fn validate(&self) -> Result<(), UserError> {
        require("account", &self.account)?;
        require("name", &self.name)?;
        require("password", &self.password)?;
        require("rePassword", &self.re_password)?;
        check_email(self.email.trim())?;
        parse_sex(&self.sex)?;

        if self.password != self.re_password {
            return Err(UserError::PasswordMismatch);
        }

        Ok(())
    }

    pub fn into_new_user(self, password: String, salt: String) -> Result<NewUser, UserError> {
        Ok(NewUser {
            sex: parse_sex(&self.sex)?.unwrap_or_default(),
            account: self.account.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password,
            salt,
        })
    }
}

/// Profile edit form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserEditForm {
    pub id: String,
    pub name: String,
    pub email: String,
    pub sex: String,
}

impl UserEditForm {
    pub fn to_changes(&self) -> Result<(i64, UserChanges), UserError> {
        let id = parse_id(&self.id)?;
        require("name", &self.name)?;
        let email = self.email.trim();
        check_email(email)?;
        let sex = parse_sex(&self.sex)?;

        Ok((
            id,
            UserChanges {
                name: Some(self.name.trim().to_string()),
                email: Some(email.to_string()),
                sex,
                ..Default::default()
            },
        ))
    }
}

/// Form carrying only the target user id
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserIdForm {
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl UserIdForm {
    pub fn user_id(&self) -> Result<i64, UserError> {
        parse_id(&self.user_id)
    }
}

/// Role assignment form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetRoleForm {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "roleIds")]
    pub role_ids: String,
}

impl SetRoleForm {
    /// Both fields are required; the role list is passed through untouched
    pub fn validate(&self) -> Result<(i64, String), UserError> {
        if self.role_ids.trim().is_empty() || self.user_id.trim().is_empty() {
            return Err(UserError::invalid_parameter());
        }

        Ok((parse_id(&self.user_id)?, self.role_ids.clone()))
    }
}
