//! Lead service

use crate::{
    error::{AppError, AppResult},
    models::lead::{Lead, LeadPayload, NewLead},
    repository::SharedRepository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct LeadsService {
    repository: SharedRepository,
    email: EmailService,
}

impl LeadsService {
    pub fn new(repository: SharedRepository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Store a lead and send the welcome email.
    ///
    /// The library lookup is not turned into a client error: an absent or
    /// unknown library id is a server error. A failed send is reported after
    /// the lead has been stored.
    pub async fn create(&self, payload: &LeadPayload) -> AppResult<Lead> {
        let library_id = payload.library.ok_or_else(|| {
            AppError::Internal("Lead library lookup failed: no library id given".to_string())
        })?;
        let library = self
            .repository
            .libraries_find(library_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Lead library lookup failed: library {} does not exist",
                    library_id
                ))
            })?;

        let email = payload.email.clone().unwrap_or_default();
        if self.repository.leads_email_exists(&email).await? {
            return Err(AppError::Conflict(format!(
                "Lead with email: {} already exists",
                email
            )));
        }

        let lead = self
            .repository
            .leads_create(&NewLead {
                email,
                fullname: payload.fullname.clone().unwrap_or_default(),
                phone: payload.phone.clone().unwrap_or_default(),
                library_id: library.id,
            })
            .await?;
        tracing::info!(lead_id = lead.id, library_id = library.id, "Lead created");

        self.email.send_lead_welcome(&lead, &library).await?;

        Ok(lead)
    }
}
