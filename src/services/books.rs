//! Book service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookPayload, BookWrite},
        Book,
    },
    repository::SharedRepository,
};

fn book_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book with id: {} does not exist", id))
}

#[derive(Clone)]
pub struct BooksService {
    repository: SharedRepository,
}

impl BooksService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books_find(id)
            .await?
            .ok_or_else(|| book_not_found(id))
    }

    /// Books whose title contains `text`, ignoring case
    pub async fn search(&self, text: &str) -> AppResult<Vec<Book>> {
        self.repository.books_search_title(text).await
    }

    /// The book if it belongs to the library, as a one-element list
    pub async fn get_in_library(&self, library_id: i32, book_id: i32) -> AppResult<Vec<Book>> {
        match self
            .repository
            .books_find_in_library(library_id, book_id)
            .await?
        {
            Some(book) => Ok(vec![book]),
            None => Err(AppError::NotFound(format!(
                "Book with id: {} does not exist in the library",
                book_id
            ))),
        }
    }

    pub async fn create(&self, payload: &BookPayload) -> AppResult<Book> {
        let data = self.resolve(payload).await?;
        let book = self.repository.books_create(&data).await?;
        tracing::info!(book_id = book.id, author_id = data.author_id, "Book created");
        Ok(book)
    }

    /// Replace title, author and the full library set
    pub async fn update(&self, id: i32, payload: &BookPayload) -> AppResult<Book> {
        if self.repository.books_find(id).await?.is_none() {
            return Err(book_not_found(id));
        }

        let data = self.resolve(payload).await?;
        let book = self
            .repository
            .books_update(id, &data)
            .await?
            .ok_or_else(|| book_not_found(id))?;
        tracing::info!(book_id = id, libraries = data.library_ids.len(), "Book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.repository.books_delete(id).await? {
            return Err(book_not_found(id));
        }
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    /// Check author and library references before anything is written
    async fn resolve(&self, payload: &BookPayload) -> AppResult<BookWrite> {
        let author_id = payload
            .author
            .as_ref()
            .and_then(|author| author.id)
            .ok_or_else(|| AppError::BadRequest("Author id is required".to_string()))?;

        if self.repository.authors_find(author_id).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Author with id: {} does not exist",
                author_id
            )));
        }

        let mut library_ids = Vec::new();
        for library in payload.libraries.iter().flatten() {
            match library.id {
                Some(id) if id != 0 => {
                    if !library_ids.contains(&id) {
                        library_ids.push(id);
                    }
                }
                _ => return Err(AppError::BadRequest("Library id is required".to_string())),
            }
        }

        if !library_ids.is_empty() {
            let existing = self.repository.libraries_existing_ids(&library_ids).await?;
            if let Some(missing) = library_ids.iter().find(|id| !existing.contains(id)) {
                return Err(AppError::BadRequest(format!(
                    "Library with id: {} does not exist",
                    missing
                )));
            }
        }

        Ok(BookWrite {
            title: payload.title.clone().unwrap_or_default(),
            author_id,
            library_ids,
        })
    }
}
