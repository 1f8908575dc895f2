//! Users repository for database operations

use async_trait::async_trait;

use super::{PgRepository, UsersRepository};
use crate::{
    error::{AppError, AppResult},
    models::User,
};

pub(crate) const USERNAME_TAKEN: &str = "A user with that username already exists";

#[async_trait]
impl UsersRepository for PgRepository {
    async fn users_find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn users_username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn users_email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn users_create(
        &self,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_username_conflict)
    }
}

/// Concurrent registrations of one username surface as a unique violation
fn map_username_conflict(error: sqlx::Error) -> AppError {
    match error {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict(USERNAME_TAKEN.to_string())
        }
        other => AppError::Database(other),
    }
}
