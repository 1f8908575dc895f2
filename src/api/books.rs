//! Book API endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{BookPayload, BookSearchQuery},
        Book,
    },
};

use super::{AuthenticatedUser, Path, ValidatedJson};

/// List all books
#[utoipa::path(
    get,
    path = "/api/book",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Books ordered by id", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Create a book with its author and libraries
#[utoipa::path(
    post,
    path = "/api/book",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Missing title, unknown author or library", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<BookPayload>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.create(&data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Search books by title
#[utoipa::path(
    get,
    path = "/api/book/search",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookSearchQuery),
    responses(
        (status = 200, description = "Books whose title contains the text", body = Vec<Book>)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<BookSearchQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state
        .services
        .books
        .search(query.text.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/api/book/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(book))
}

/// Replace title, author and library set
#[utoipa::path(
    put,
    path = "/api/book/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Missing title, unknown author or library", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<BookPayload>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.update(id, &data).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/book/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a book through one of its libraries
#[utoipa::path(
    get,
    path = "/api/library/{id}/books/{book_id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Library ID"),
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "One-element list with the book", body = Vec<Book>),
        (status = 404, description = "Book not in the library", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_library_book(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path((library_id, book_id)): Path<(i32, i32)>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state
        .services
        .books
        .get_in_library(library_id, book_id)
        .await?;
    Ok(Json(books))
}
