//! Lead API endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{lead::LeadPayload, Lead},
};

use super::{AuthenticatedUser, ValidatedJson};

/// Register a lead and send the welcome email
#[utoipa::path(
    post,
    path = "/api/lead",
    tag = "leads",
    security(("bearer_auth" = [])),
    request_body = LeadPayload,
    responses(
        (status = 201, description = "Lead created", body = Lead),
        (status = 400, description = "Email missing or already registered", body = crate::error::ErrorResponse),
        (status = 500, description = "Library lookup or email delivery failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_lead(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    ValidatedJson(data): ValidatedJson<LeadPayload>,
) -> AppResult<(StatusCode, Json<Lead>)> {
    let lead = state.services.leads.create(&data).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}
