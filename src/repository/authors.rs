//! Authors repository for database operations

use async_trait::async_trait;

use super::{AuthorsRepository, PgRepository};
use crate::{error::AppResult, models::Author};

#[async_trait]
impl AuthorsRepository for PgRepository {
    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, last_name FROM authors ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn authors_find(&self, id: i32) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, last_name FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn authors_create(&self, first_name: &str, last_name: &str) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name)
            VALUES ($1, $2)
            RETURNING id, first_name, last_name
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn authors_update(
        &self,
        id: i32,
        first_name: &str,
        last_name: &str,
    ) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors SET first_name = $1, last_name = $2
            WHERE id = $3
            RETURNING id, first_name, last_name
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn authors_delete(&self, id: i32) -> AppResult<bool> {
        // Books by this author are removed too (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
