//! Lead model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Prospective-customer contact tied to one library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lead {
    pub id: i32,
    pub email: String,
    pub fullname: String,
    pub phone: String,
    #[serde(rename = "library")]
    pub library_id: i32,
}

/// Create lead request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LeadPayload {
    #[validate(
        required(message = "The email is required to add a Lead"),
        length(min = 1, message = "The email is required to add a Lead")
    )]
    pub email: Option<String>,
    pub fullname: Option<String>,
    pub phone: Option<String>,
    /// Library id
    pub library: Option<i32>,
}

/// Lead fields ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub email: String,
    pub fullname: String,
    pub phone: String,
    pub library_id: i32,
}
