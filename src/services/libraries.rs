//! Library service

use crate::{
    error::{AppError, AppResult},
    models::Library,
    repository::SharedRepository,
};

pub fn library_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Library with id: {} does not exist", id))
}

#[derive(Clone)]
pub struct LibrariesService {
    repository: SharedRepository,
}

impl LibrariesService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Library>> {
        self.repository.libraries_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Library> {
        self.repository
            .libraries_find(id)
            .await?
            .ok_or_else(|| library_not_found(id))
    }

    pub async fn create(&self, name: &str) -> AppResult<Library> {
        let library = self.repository.libraries_create(name).await?;
        tracing::info!(library_id = library.id, "Library created");
        Ok(library)
    }

    /// Only the name is writable
    pub async fn update_name(&self, id: i32, name: &str) -> AppResult<Library> {
        let library = self
            .repository
            .libraries_update_name(id, name)
            .await?
            .ok_or_else(|| library_not_found(id))?;
        tracing::info!(library_id = id, "Library updated");
        Ok(library)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.repository.libraries_delete(id).await? {
            return Err(library_not_found(id));
        }
        tracing::info!(library_id = id, "Library deleted");
        Ok(())
    }
}
