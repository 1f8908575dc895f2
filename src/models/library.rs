//! Library model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Library record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Library {
    pub id: i32,
    pub name: String,
}

/// Create/update library request
///
/// Any `id` in the body is ignored; only `name` is written.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LibraryPayload {
    #[validate(
        required(message = "The name is required to add a library"),
        length(min = 1, message = "The name is required to add a library")
    )]
    pub name: Option<String>,
}

impl LibraryPayload {
    /// Name after validation has passed
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Library reference inside a book payload
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LibraryRef {
    pub id: Option<i32>,
}
