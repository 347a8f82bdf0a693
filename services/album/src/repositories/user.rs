//! User repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::info;

use crate::models::User;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

fn map_user(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        password_changed: row.get::<i64, _>("password_changed") != 0,
        created_at: row.get("created_at"),
    }
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Hash a password with a fresh random salt
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        Ok(hash)
    }

    /// Verify a password against a user's stored hash
    pub fn verify_password(user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Seed a default user when the users table is empty
    ///
    /// Idempotent: a no-op when any row already exists.
    pub async fn seed_if_empty(&self, username: &str, password: &str) -> Result<()> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.get("count");

        if count > 0 {
            return Ok(());
        }

        let password_hash = Self::hash_password(password)?;
        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, password_changed)
            VALUES ($1, $2, 0)
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .execute(&self.pool)
        .await?;

        info!("Default user created: username=\"{}\"", username);
        Ok(())
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, password_changed, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_user))
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, password_changed, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_user))
    }

    /// Replace a user's password hash and mark the password as changed
    pub async fn update_password(&self, id: i64, new_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = $1, password_changed = 1 WHERE id = $2")
            .bind(new_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repo() -> UserRepository {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory database");
        common::database::run_migrations(&pool)
            .await
            .expect("migration failed");
        UserRepository::new(pool)
    }

    #[tokio::test]
    async fn test_seed_if_empty_is_idempotent() {
        let repo = test_repo().await;

        repo.seed_if_empty("eshant", "iloveyou")
            .await
            .expect("first seed failed");
        repo.seed_if_empty("eshant", "iloveyou")
            .await
            .expect("second seed failed");

        let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&repo.pool)
            .await
            .expect("count query failed");
        let count: i64 = row.get("count");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_seeded_user_has_unchanged_password_flag() {
        let repo = test_repo().await;
        repo.seed_if_empty("eshant", "iloveyou")
            .await
            .expect("seed failed");

        let user = repo
            .find_by_username("eshant")
            .await
            .expect("lookup failed")
            .expect("seeded user missing");
        assert!(!user.password_changed);
        assert!(UserRepository::verify_password(&user, "iloveyou").expect("verify errored"));
        assert!(!UserRepository::verify_password(&user, "wrong").expect("verify errored"));
    }

    #[tokio::test]
    async fn test_find_by_username_missing_returns_none() {
        let repo = test_repo().await;
        let user = repo
            .find_by_username("nobody")
            .await
            .expect("lookup failed");
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_update_password_sets_changed_flag() {
        let repo = test_repo().await;
        repo.seed_if_empty("eshant", "iloveyou")
            .await
            .expect("seed failed");

        let user = repo
            .find_by_username("eshant")
            .await
            .expect("lookup failed")
            .expect("seeded user missing");

        let new_hash = UserRepository::hash_password("abcd").expect("hash failed");
        repo.update_password(user.id, &new_hash)
            .await
            .expect("update failed");

        let updated = repo
            .find_by_id(user.id)
            .await
            .expect("lookup failed")
            .expect("user vanished");
        assert!(updated.password_changed);
        assert!(UserRepository::verify_password(&updated, "abcd").expect("verify errored"));
        assert!(!UserRepository::verify_password(&updated, "iloveyou").expect("verify errored"));
    }
}
