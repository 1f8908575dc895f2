//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    author::{Author, AuthorRef},
    library::{Library, LibraryRef},
};

/// Book with its author and libraries expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: Author,
    pub libraries: Vec<Library>,
}

/// Create/update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookPayload {
    #[validate(
        required(message = "The title is required to add/update a Book"),
        length(min = 1, message = "The title is required to add/update a Book")
    )]
    pub title: Option<String>,
    pub author: Option<AuthorRef>,
    /// Replaces the whole library set; absent or empty clears it
    pub libraries: Option<Vec<LibraryRef>>,
}

/// Book fields resolved against storage, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookWrite {
    pub title: String,
    pub author_id: i32,
    pub library_ids: Vec<i32>,
}

/// Book search query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookSearchQuery {
    /// Case-insensitive substring of the title
    pub text: Option<String>,
}

/// Internal row for book queries joined with the author
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub author_first_name: String,
    pub author_last_name: String,
}

/// Internal row for a book's library membership
#[derive(Debug, Clone, FromRow)]
pub struct BookLibraryRow {
    pub book_id: i32,
    pub library_id: i32,
    pub library_name: String,
}

impl BookRow {
    pub fn into_book(self, libraries: Vec<Library>) -> Book {
        Book {
            id: self.id,
            title: self.title,
            author: Author {
                id: self.author_id,
                first_name: self.author_first_name,
                last_name: self.author_last_name,
            },
            libraries,
        }
    }
}
