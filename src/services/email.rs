//! Email service for lead notifications

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::{Lead, Library},
};

/// Outgoing mail transport
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// SMTP mailer built from configuration
pub struct SmtpMailer {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let from_name = config.smtp_from_name.as_deref().unwrap_or("Shelf");
        let from = Mailbox::from_str(&format!("{} <{}>", from_name, config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let builder = if config.smtp_use_tls {
            SmtpTransport::starttls_relay(&config.smtp_host).map_err(|e| {
                AppError::Internal(format!("Failed to create SMTP transport: {}", e))
            })?
        } else {
            SmtpTransport::builder_dangerous(&config.smtp_host)
        }
        .port(config.smtp_port);

        let builder = if let (Some(username), Some(password)) =
            (&config.smtp_username, &config.smtp_password)
        {
            builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            builder
        };

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        // SmtpTransport blocks; keep it off the async workers
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

/// Mailer used when email is disabled: records the message in the log
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> AppResult<()> {
        tracing::info!(%to, %subject, "Email delivery disabled, message not sent");
        Ok(())
    }
}

#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<dyn Mailer>,
}

impl EmailService {
    /// Pick the mailer matching the configuration
    pub fn new(config: &EmailConfig) -> AppResult<Self> {
        let mailer: Arc<dyn Mailer> = if config.enabled {
            Arc::new(SmtpMailer::new(config)?)
        } else {
            Arc::new(LogMailer)
        };
        Ok(Self { mailer })
    }

    pub fn with_mailer(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Send the welcome message to a newly registered lead
    pub async fn send_lead_welcome(&self, lead: &Lead, library: &Library) -> AppResult<()> {
        let subject = format!("Welcome to {}", library.name);
        let greeting = if lead.fullname.is_empty() {
            "Hello,".to_string()
        } else {
            format!("Hello {},", lead.fullname)
        };
        let body = format!(
            r#"{greeting}

Thank you for your interest in {library}.

We will contact you soon with more information about our collection and services.
"#,
            greeting = greeting,
            library = library.name
        );

        self.mailer.send(&lead.email, &subject, &body).await
    }
}
