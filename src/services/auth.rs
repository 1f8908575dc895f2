//! Authentication and registration service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        is_blank,
        user::{RegisterUser, UserProfile},
        User, UserClaims,
    },
    repository::{users::USERNAME_TAKEN, SharedRepository},
};

#[derive(Clone)]
pub struct AuthService {
    repository: SharedRepository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: SharedRepository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Check credentials and return a signed JWT
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<String> {
        let user = self
            .repository
            .users_find_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            tracing::warn!(%username, "Rejected login");
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        self.create_token_for_user(&user)
    }

    /// Create JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = i64::try_from(self.config.jwt_expiration_hours)
            .ok()
            .and_then(|hours| hours.checked_mul(3600))
            .and_then(|seconds| now.checked_add(seconds))
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "jwt_expiration_hours out of range: {}",
                    self.config.jwt_expiration_hours
                ))
            })?;

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            email: user.email.clone(),
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Create a user account.
    ///
    /// Only rejects a request where all three fields are empty; a missing
    /// password leaves the account unable to log in.
    pub async fn register(&self, request: RegisterUser) -> AppResult<UserProfile> {
        if is_blank(&request.username) && is_blank(&request.password) && is_blank(&request.email)
        {
            return Err(AppError::Validation(
                "username, password and email is required to register a user".to_string(),
            ));
        }

        let username = request.username.unwrap_or_default();
        let email = request.email.unwrap_or_default();

        if username.is_empty() {
            return Err(AppError::Validation(
                "The given username must be set".to_string(),
            ));
        }
        if self.repository.users_username_exists(&username).await? {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
        }
        if !email.is_empty() && self.repository.users_email_exists(&email).await? {
            return Err(AppError::Conflict(
                "A user with that email already exists".to_string(),
            ));
        }

        let password = match request.password.as_deref() {
            Some(password) if !password.is_empty() => Some(self.hash_password(password)?),
            _ => None,
        };

        let user = self
            .repository
            .users_create(&username, &email, password.as_deref())
            .await?;
        tracing::info!(user_id = user.id, "User registered");

        Ok(user.into())
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        if let Some(ref hash) = user.password {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok());
        }

        Ok(false)
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
