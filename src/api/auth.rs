//! Authentication endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{RegisterUser, UserProfile},
};

use super::ValidatedJson;

/// Login request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Token endpoint response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials, empty body")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Response {
    match state
        .services
        .auth
        .authenticate(&request.username, &request.password)
        .await
    {
        Ok(token) => Json(LoginResponse {
            message: "User logged in successfully".to_string(),
            token,
        })
        .into_response(),
        Err(AppError::Authentication(_)) => StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered", body = UserProfile),
        (status = 400, description = "Missing fields or duplicate user", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<RegisterUser>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    let profile = state.services.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api-token-auth/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn obtain_token(
    State(state): State<crate::AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .services
        .auth
        .authenticate(&request.username, &request.password)
        .await
        .map_err(|e| match e {
            AppError::Authentication(_) => {
                AppError::BadRequest("Unable to log in with provided credentials.".to_string())
            }
            other => other,
        })?;
    Ok(Json(TokenResponse { token }))
}
