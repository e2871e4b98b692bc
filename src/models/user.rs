//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::Validate;

use crate::error::AppError;

/// Account role carried in every identity token
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "faculty" => Ok(Role::Faculty),
            "admin" => Ok(Role::Admin),
            other => Err(AppError::BadRequest(format!("Unknown role: {}", other))),
        }
    }
}

/// User account row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String, // student, faculty, admin
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Result<Role, AppError> {
        self.role.parse().map_err(|_| {
            AppError::Internal(format!("user {} has unknown role '{}'", self.id, self.role))
        })
    }
}

/// Stored credential as seen by the credential service
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<User> for Credential {
    type Error = AppError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        let role = user.role()?;
        Ok(Self {
            id: user.id,
            username: user.username,
            password_hash: user.password_hash,
            role,
            name: user.name,
            email: user.email,
        })
    }
}

/// Credential to be inserted; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Redacted identity summary returned after login/registration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    pub role: Role,
}

impl From<&Credential> for UserSummary {
    fn from(c: &Credential) -> Self {
        Self {
            id: c.id,
            username: c.username.clone(),
            name: c.name.clone(),
            role: c.role,
        }
    }
}

/// Profile of the calling user (without sensitive data)
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
        }
    }
}

/// Update own profile request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}
