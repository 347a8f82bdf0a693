//! Error types for the embedded SQLite store
//!
//! Startup errors (opening the database file, creating the schema) are
//! fatal to the process; query errors surface per request.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Errors raised by the database layer
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Opening or connecting to the SQLite database file failed
    #[error("Failed to open SQLite database: {0}")]
    Connection(#[source] SqlxError),

    /// A query against the store failed
    #[error("SQLite query error: {0}")]
    Query(#[source] SqlxError),

    /// Creating the users table at startup failed
    #[error("Failed to create users table: {0}")]
    Migration(String),

    /// The configured database path could not be turned into connect options
    #[error("Invalid database configuration: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_failure() {
        let err = DatabaseError::Migration("table exists with wrong shape".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to create users table: table exists with wrong shape"
        );

        let err = DatabaseError::Configuration("bad path".to_string());
        assert_eq!(err.to_string(), "Invalid database configuration: bad path");
    }

    #[test]
    fn test_query_error_keeps_source() {
        use std::error::Error;

        let err = DatabaseError::Query(SqlxError::RowNotFound);
        assert!(err.source().is_some());
    }
}
