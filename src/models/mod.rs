//! Data models for Shelf

pub mod author;
pub mod book;
pub mod lead;
pub mod library;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::Book;
pub use lead::Lead;
pub use library::Library;
pub use user::{User, UserClaims};

/// True when an optional text field is absent or empty
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}
