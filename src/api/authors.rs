//! Author API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{author::AuthorPayload, Author},
};

use super::{AuthenticatedUser, Path, ValidatedJson};

/// List all authors
#[utoipa::path(
    get,
    path = "/api/author",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authors ordered by id", body = Vec<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/api/author",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = AuthorPayload,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Both names missing", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<AuthorPayload>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state
        .services
        .authors
        .create(data.first_name(), data.last_name())
        .await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/api/author/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(author))
}

/// Replace both author names
#[utoipa::path(
    put,
    path = "/api/author/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorPayload,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Both names missing", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<AuthorPayload>,
) -> AppResult<Json<Author>> {
    let author = state
        .services
        .authors
        .update(id, data.first_name(), data.last_name())
        .await?;
    Ok(Json(author))
}

/// Delete an author and their books
#[utoipa::path(
    delete,
    path = "/api/author/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
