//! Account model: one identity per registered user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role, fixed at registration for the lifetime of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Chef,
    Client,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Chef => "chef",
            Role::Client => "client",
        }
    }
}

/// Account row. The password hash never leaves the backend; response
/// types in the routes layer expose only the public fields.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    /// Globally unique
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Display name
    pub name: String,
    pub role: Role,
    /// Optional external-identity reference (OAuth linking)
    pub firebase_uid: Option<String>,
    pub created_at: DateTime<Utc>,
    /// None until the account is first updated
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields needed to create an account at registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
}
