//! Data models for the album service

use chrono::NaiveDateTime;
use serde::Serialize;

/// User account record
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID
    pub id: i64,
    /// Username
    pub username: String,
    /// Argon2 password hash
    pub password_hash: String,
    /// Whether the seeded default password has been changed
    pub password_changed: bool,
    /// Account creation timestamp
    pub created_at: NaiveDateTime,
}

/// Identity decoded from a verified token, attached to request extensions
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

/// Public view of a user returned by auth endpoints
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
