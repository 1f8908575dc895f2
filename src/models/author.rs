//! Author model and related types

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::is_blank;

pub const AUTHOR_NAMES_REQUIRED: &str =
    "The first name and last name is required to add a Author";

/// Author record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// Create/update author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_author_names"))]
pub struct AuthorPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl AuthorPayload {
    pub fn first_name(&self) -> &str {
        self.first_name.as_deref().unwrap_or_default()
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_deref().unwrap_or_default()
    }
}

// Either name is enough.
fn validate_author_names(payload: &AuthorPayload) -> Result<(), ValidationError> {
    if is_blank(&payload.first_name) && is_blank(&payload.last_name) {
        let mut error = ValidationError::new("author_names");
        error.message = Some(Cow::Borrowed(AUTHOR_NAMES_REQUIRED));
        return Err(error);
    }
    Ok(())
}

/// Author reference inside a book payload
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AuthorRef {
    pub id: Option<i32>,
}
