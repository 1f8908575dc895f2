//! API handlers for Shelf REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod leads;
pub mod libraries;
pub mod openapi;
pub mod validation;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    RequestPartsExt, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

pub use validation::{Path, ValidatedJson};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                AppError::Authentication("Missing or invalid authorization header".to_string())
            })?;

        let claims = UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        // Libraries
        .route(
            "/library",
            get(libraries::list_libraries).post(libraries::create_library),
        )
        .route(
            "/library/:id",
            get(libraries::get_library)
                .put(libraries::update_library)
                .delete(libraries::delete_library),
        )
        .route(
            "/library/:id/books/:book_id",
            get(books::get_library_book),
        )
        // Authors
        .route(
            "/author",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/author/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Books
        .route("/book", get(books::list_books).post(books::create_book))
        .route("/book/search", get(books::search_books))
        .route(
            "/book/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Leads
        .route("/lead", post(leads::create_lead));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/api-token-auth/", post(auth::obtain_token))
        .nest("/api", api)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
