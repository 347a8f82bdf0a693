//! Application configuration loaded from environment variables

use std::env;
use std::path::PathBuf;

/// Application configuration
///
/// # Environment Variables
/// - `JWT_SECRET`: HMAC secret for signing tokens
/// - `JWT_EXPIRES_IN_SECS`: token lifetime in seconds (default: 86400)
/// - `UPLOADS_DIR`: root directory for served media (default: `uploads`)
/// - `DATABASE_PATH`: SQLite database file (default: `data.db`)
/// - `DEFAULT_USERNAME` / `DEFAULT_PASSWORD`: credentials seeded on first run
/// - `BIND_ADDR`: listen address (default: `0.0.0.0:3000`)
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Secret for signing and verifying tokens
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub jwt_expires_in_secs: u64,
    /// Root directory for served media files
    pub uploads_dir: PathBuf,
    /// Username seeded when the users table is empty
    pub default_username: String,
    /// Password seeded when the users table is empty
    pub default_password: String,
    /// Address the server binds to
    pub bind_addr: String,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    pub fn from_env() -> Self {
        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "fallback-secret-key".to_string());

        let jwt_expires_in_secs = env::var("JWT_EXPIRES_IN_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400); // 24 hours

        let uploads_dir = env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        let default_username =
            env::var("DEFAULT_USERNAME").unwrap_or_else(|_| "eshant".to_string());
        let default_password =
            env::var("DEFAULT_PASSWORD").unwrap_or_else(|_| "iloveyou".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        AppConfig {
            jwt_secret,
            jwt_expires_in_secs,
            uploads_dir,
            default_username,
            default_password,
            bind_addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_env_unset() {
        unsafe {
            env::remove_var("JWT_SECRET");
            env::remove_var("JWT_EXPIRES_IN_SECS");
            env::remove_var("UPLOADS_DIR");
            env::remove_var("DEFAULT_USERNAME");
            env::remove_var("DEFAULT_PASSWORD");
            env::remove_var("BIND_ADDR");
        }

        let config = AppConfig::from_env();
        assert_eq!(config.jwt_secret, "fallback-secret-key");
        assert_eq!(config.jwt_expires_in_secs, 86400);
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(config.default_username, "eshant");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        unsafe {
            env::set_var("JWT_SECRET", "test-secret");
            env::set_var("JWT_EXPIRES_IN_SECS", "3600");
        }

        let config = AppConfig::from_env();
        assert_eq!(config.jwt_secret, "test-secret");
        assert_eq!(config.jwt_expires_in_secs, 3600);

        unsafe {
            env::remove_var("JWT_SECRET");
            env::remove_var("JWT_EXPIRES_IN_SECS");
        }
    }
}
