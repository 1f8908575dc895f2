//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, leads, libraries};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelf API",
        version = "1.0.0",
        description = "Libraries, books, authors and leads REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::register,
        auth::obtain_token,
        // Libraries
        libraries::list_libraries,
        libraries::create_library,
        libraries::get_library,
        libraries::update_library,
        libraries::delete_library,
        // Authors
        authors::list_authors,
        authors::create_author,
        authors::get_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::create_book,
        books::search_books,
        books::get_book,
        books::update_book,
        books::delete_book,
        books::get_library_book,
        // Leads
        leads::create_lead,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::TokenResponse,
            crate::models::user::RegisterUser,
            crate::models::user::UserProfile,
            // Libraries
            crate::models::library::Library,
            crate::models::library::LibraryPayload,
            crate::models::library::LibraryRef,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorPayload,
            crate::models::author::AuthorRef,
            // Books
            crate::models::book::Book,
            crate::models::book::BookPayload,
            crate::models::book::BookSearchQuery,
            // Leads
            crate::models::lead::Lead,
            crate::models::lead::LeadPayload,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "libraries", description = "Library management"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book catalog and search"),
        (name = "leads", description = "Prospective customer contacts")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
