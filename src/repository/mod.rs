//! Repository layer for database operations
//!
//! Each domain gets its own trait so services only see what they use.
//! [`PgRepository`] is the production backend; [`MemoryRepository`] keeps the
//! same semantics in process for local runs and tests.

pub mod authors;
pub mod books;
pub mod leads;
pub mod libraries;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::BookWrite,
        lead::NewLead,
        Author, Book, Lead, Library, User,
    },
};

pub use memory::MemoryRepository;

#[async_trait]
pub trait LibrariesRepository: Send + Sync {
    async fn libraries_list(&self) -> AppResult<Vec<Library>>;
    async fn libraries_find(&self, id: i32) -> AppResult<Option<Library>>;
    /// Subset of `ids` that exist
    async fn libraries_existing_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>>;
    async fn libraries_create(&self, name: &str) -> AppResult<Library>;
    async fn libraries_update_name(&self, id: i32, name: &str) -> AppResult<Option<Library>>;
    async fn libraries_delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait AuthorsRepository: Send + Sync {
    async fn authors_list(&self) -> AppResult<Vec<Author>>;
    async fn authors_find(&self, id: i32) -> AppResult<Option<Author>>;
    async fn authors_create(&self, first_name: &str, last_name: &str) -> AppResult<Author>;
    async fn authors_update(
        &self,
        id: i32,
        first_name: &str,
        last_name: &str,
    ) -> AppResult<Option<Author>>;
    async fn authors_delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait BooksRepository: Send + Sync {
    async fn books_list(&self) -> AppResult<Vec<Book>>;
    async fn books_find(&self, id: i32) -> AppResult<Option<Book>>;
    async fn books_find_in_library(&self, library_id: i32, book_id: i32) -> AppResult<Option<Book>>;
    async fn books_search_title(&self, text: &str) -> AppResult<Vec<Book>>;
    async fn books_create(&self, data: &BookWrite) -> AppResult<Book>;
    /// Replaces title, author and the whole library set
    async fn books_update(&self, id: i32, data: &BookWrite) -> AppResult<Option<Book>>;
    async fn books_delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait LeadsRepository: Send + Sync {
    async fn leads_email_exists(&self, email: &str) -> AppResult<bool>;
    async fn leads_create(&self, data: &NewLead) -> AppResult<Lead>;
}

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn users_find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn users_username_exists(&self, username: &str) -> AppResult<bool>;
    async fn users_email_exists(&self, email: &str) -> AppResult<bool>;
    async fn users_create(
        &self,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> AppResult<User>;
}

/// Full storage surface used by the services
#[async_trait]
pub trait Repository:
    LibrariesRepository + AuthorsRepository + BooksRepository + LeadsRepository + UsersRepository
{
    /// Check that storage is reachable
    async fn ping(&self) -> AppResult<()>;
}

pub type SharedRepository = Arc<dyn Repository>;

/// PostgreSQL repository holding the connection pool
#[derive(Clone)]
pub struct PgRepository {
    pub pool: Pool<Postgres>,
}

impl PgRepository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
