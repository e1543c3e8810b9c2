use kindle_logging::{kindle_debug, kindle_info};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::epub::EpubFile;

pub const INCOMPLETE_CONFIGURATION: &str = "Email configuration incomplete. Please set SMTP_USERNAME, SMTP_PASSWORD, and KINDLE_EMAIL in .env";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub kindle_email: Option<String>,
    pub from_email: Option<String>,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: None,
            password: None,
            kindle_email: None,
            from_email: None,
        }
    }
}

impl MailSettings {
    pub fn status(&self) -> MailStatus {
        MailStatus {
            kindle_configured: self.kindle_email.is_some(),
            smtp_configured: self.username.is_some() && self.password.is_some(),
        }
    }
}

/// What the health endpoint reports about delivery readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MailStatus {
    pub kindle_configured: bool,
    pub smtp_configured: bool,
}

impl MailStatus {
    pub fn is_complete(self) -> bool {
        self.kindle_configured && self.smtp_configured
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Email configuration incomplete. Please set SMTP_USERNAME, SMTP_PASSWORD, and KINDLE_EMAIL in .env")]
    NotConfigured,
    #[error("invalid address {address}: {message}")]
    Address { address: String, message: String },
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("smtp error: {0}")]
    Transport(String),
}

/// Delivers a packaged article to the configured Kindle address.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    fn status(&self) -> MailStatus;
    async fn send(&self, title: &str, epub: &EpubFile) -> Result<(), MailError>;
}

/// STARTTLS SMTP delivery with username/password login.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    settings: MailSettings,
}

impl SmtpMailer {
    pub fn new(settings: MailSettings) -> Self {
        Self { settings }
    }

    /// Builds the mail; exposed so the message layout can be inspected
    /// without a server.
    pub fn compose(&self, title: &str, epub: &EpubFile) -> Result<Message, MailError> {
        let (Some(username), Some(_), Some(kindle_email)) = (
            self.settings.username.as_deref(),
            self.settings.password.as_deref(),
            self.settings.kindle_email.as_deref(),
        ) else {
            return Err(MailError::NotConfigured);
        };
        let from = self.settings.from_email.as_deref().unwrap_or(username);

        let attachment_type = ContentType::parse(EpubFile::MEDIA_TYPE)
            .map_err(|err| MailError::Message(err.to_string()))?;
        let body = format!("Article: {title}\nSent via Kindle Sender");

        Message::builder()
            .from(parse_mailbox(from)?)
            .to(parse_mailbox(kindle_email)?)
            .subject(format!("Kindle: {title}"))
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body))
                    .singlepart(
                        Attachment::new(epub.filename.clone())
                            .body(epub.bytes.clone(), attachment_type),
                    ),
            )
            .map_err(|err| MailError::Message(err.to_string()))
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    fn status(&self) -> MailStatus {
        self.settings.status()
    }

    async fn send(&self, title: &str, epub: &EpubFile) -> Result<(), MailError> {
        let message = self.compose(title, epub)?;
        let (Some(username), Some(password)) = (
            self.settings.username.clone(),
            self.settings.password.clone(),
        ) else {
            return Err(MailError::NotConfigured);
        };

        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.smtp_server)
                .map_err(|err| MailError::Transport(err.to_string()))?
                .port(self.settings.smtp_port)
                .credentials(Credentials::new(username, password))
                .build();

        kindle_debug!(
            "Connecting to {}:{} for \"{}\" ({} bytes)",
            self.settings.smtp_server,
            self.settings.smtp_port,
            title,
            epub.bytes.len()
        );
        transport
            .send(message)
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;
        kindle_info!("Mailed \"{}\" as {}", title, epub.filename);
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|err| MailError::Address {
        address: address.to_string(),
        message: err.to_string(),
    })
}
