//! Business logic services

pub mod auth;
pub mod authors;
pub mod books;
pub mod email;
pub mod leads;
pub mod libraries;

use crate::{
    config::{AuthConfig, EmailConfig},
    error::AppResult,
    repository::SharedRepository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub libraries: libraries::LibrariesService,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub leads: leads::LeadsService,
    pub repository: SharedRepository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: SharedRepository,
        auth_config: AuthConfig,
        email_config: &EmailConfig,
    ) -> AppResult<Self> {
        let email = email::EmailService::new(email_config)?;
        Ok(Self::with_email(repository, auth_config, email))
    }

    /// Same as [`Services::new`] with an explicit email service
    pub fn with_email(
        repository: SharedRepository,
        auth_config: AuthConfig,
        email: email::EmailService,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            libraries: libraries::LibrariesService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            leads: leads::LeadsService::new(repository.clone(), email),
            repository,
        }
    }
}
