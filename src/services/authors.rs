//! Author service

use crate::{
    error::{AppError, AppResult},
    models::Author,
    repository::SharedRepository,
};

fn author_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Author with id: {} does not exist", id))
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: SharedRepository,
}

impl AuthorsService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.repository
            .authors_find(id)
            .await?
            .ok_or_else(|| author_not_found(id))
    }

    pub async fn create(&self, first_name: &str, last_name: &str) -> AppResult<Author> {
        let author = self.repository.authors_create(first_name, last_name).await?;
        tracing::info!(author_id = author.id, "Author created");
        Ok(author)
    }

    pub async fn update(&self, id: i32, first_name: &str, last_name: &str) -> AppResult<Author> {
        let author = self
            .repository
            .authors_update(id, first_name, last_name)
            .await?
            .ok_or_else(|| author_not_found(id))?;
        tracing::info!(author_id = id, "Author updated");
        Ok(author)
    }

    /// Delete an author together with their books
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.repository.authors_delete(id).await? {
            return Err(author_not_found(id));
        }
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }
}
