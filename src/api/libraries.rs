//! Library API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{library::LibraryPayload, Library},
};

use super::{AuthenticatedUser, Path, ValidatedJson};

/// List all libraries
#[utoipa::path(
    get,
    path = "/api/library",
    tag = "libraries",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Libraries ordered by id", body = Vec<Library>)
    )
)]
pub async fn list_libraries(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<Vec<Library>>> {
    let libraries = state.services.libraries.list().await?;
    Ok(Json(libraries))
}

/// Create a library
#[utoipa::path(
    post,
    path = "/api/library",
    tag = "libraries",
    security(("bearer_auth" = [])),
    request_body = LibraryPayload,
    responses(
        (status = 201, description = "Library created", body = Library),
        (status = 400, description = "Name missing", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_library(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<LibraryPayload>,
) -> AppResult<(StatusCode, Json<Library>)> {
    let library = state.services.libraries.create(data.name()).await?;
    Ok((StatusCode::CREATED, Json(library)))
}

/// Get library by ID
#[utoipa::path(
    get,
    path = "/api/library/{id}",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Library details", body = Library),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_library(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Library>> {
    let library = state.services.libraries.get_by_id(id).await?;
    Ok(Json(library))
}

/// Rename a library
#[utoipa::path(
    put,
    path = "/api/library/{id}",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Library ID")),
    request_body = LibraryPayload,
    responses(
        (status = 200, description = "Library updated", body = Library),
        (status = 400, description = "Name missing", body = crate::error::ErrorResponse),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_library(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
    ValidatedJson(data): ValidatedJson<LibraryPayload>,
) -> AppResult<Json<Library>> {
    let library = state
        .services
        .libraries
        .update_name(id, data.name())
        .await?;
    Ok(Json(library))
}

/// Delete a library with its books' memberships and leads
#[utoipa::path(
    delete,
    path = "/api/library/{id}",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 204, description = "Library deleted"),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_library(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.libraries.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
