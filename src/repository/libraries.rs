//! Libraries repository for database operations

use async_trait::async_trait;

use super::{LibrariesRepository, PgRepository};
use crate::{error::AppResult, models::Library};

#[async_trait]
impl LibrariesRepository for PgRepository {
    async fn libraries_list(&self) -> AppResult<Vec<Library>> {
        let rows = sqlx::query_as::<_, Library>("SELECT id, name FROM libraries ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn libraries_find(&self, id: i32) -> AppResult<Option<Library>> {
        let row = sqlx::query_as::<_, Library>("SELECT id, name FROM libraries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn libraries_existing_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        let found: Vec<i32> = sqlx::query_scalar("SELECT id FROM libraries WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(found)
    }

    async fn libraries_create(&self, name: &str) -> AppResult<Library> {
        let row = sqlx::query_as::<_, Library>(
            "INSERT INTO libraries (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn libraries_update_name(&self, id: i32, name: &str) -> AppResult<Option<Library>> {
        let row = sqlx::query_as::<_, Library>(
            "UPDATE libraries SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn libraries_delete(&self, id: i32) -> AppResult<bool> {
        // book_libraries and leads rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM libraries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
