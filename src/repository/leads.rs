//! Leads repository for database operations

use async_trait::async_trait;

use super::{LeadsRepository, PgRepository};
use crate::{
    error::{AppError, AppResult},
    models::{lead::NewLead, Lead},
};

#[async_trait]
impl LeadsRepository for PgRepository {
    async fn leads_email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM leads WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn leads_create(&self, data: &NewLead) -> AppResult<Lead> {
        sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (email, fullname, phone, library_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, fullname, phone, library_id
            "#,
        )
        .bind(&data.email)
        .bind(&data.fullname)
        .bind(&data.phone)
        .bind(data.library_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            // Lost a race with another insert of the same email
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
                format!("Lead with email: {} already exists", data.email),
            ),
            other => AppError::Database(other),
        })
    }
}
