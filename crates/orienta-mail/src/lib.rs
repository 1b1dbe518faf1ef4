//! The delivery channel: emails the generated report to the respondent.
//!
//! Delivery is optional infrastructure — when SMTP settings are absent the
//! channel is disabled and callers treat the failure as a non-fatal warning,
//! never rolling back an already-committed result.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use orienta_core::MailSettings;

/// One outbound email, optionally carrying the report as an attachment.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<OutboundAttachment>,
}

#[derive(Debug, Clone)]
pub struct OutboundAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail delivery is disabled")]
    Disabled,
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("invalid attachment content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),
    #[error("failed to assemble message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Seam between the request flow and the mail transport, so handlers can be
/// exercised without a live SMTP server.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Hand one message to the transport.
    async fn send(&self, message: OutboundMessage) -> Result<(), MailError>;

    fn is_enabled(&self) -> bool {
        true
    }
}

/// STARTTLS SMTP delivery over lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer from the configured SMTP settings.
    ///
    /// # Errors
    ///
    /// Returns [`MailError`] if the relay host is invalid or the sender
    /// address does not parse.
    pub fn from_settings(settings: &MailSettings) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port);
        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }
        Ok(Self {
            transport: builder.build(),
            from: settings.from.parse()?,
        })
    }
}

#[async_trait]
impl DeliveryChannel for SmtpMailer {
    async fn send(&self, message: OutboundMessage) -> Result<(), MailError> {
        let email = build_message(&self.from, &message)?;
        self.transport.send(email).await?;
        tracing::info!(to = %message.to, "report email handed to smtp transport");
        Ok(())
    }
}

/// No-op channel used when SMTP settings are absent. Every send fails with
/// [`MailError::Disabled`], which callers report as a warning.
pub struct DisabledMailer;

#[async_trait]
impl DeliveryChannel for DisabledMailer {
    async fn send(&self, _message: OutboundMessage) -> Result<(), MailError> {
        Err(MailError::Disabled)
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Pick the channel implied by configuration: SMTP when settings are
/// present, the disabled channel otherwise.
///
/// # Errors
///
/// Returns [`MailError`] if configured settings are invalid.
pub fn build_mailer(
    settings: Option<&MailSettings>,
) -> Result<Box<dyn DeliveryChannel>, MailError> {
    match settings {
        Some(settings) => Ok(Box::new(SmtpMailer::from_settings(settings)?)),
        None => {
            tracing::warn!("mail settings absent; report delivery disabled");
            Ok(Box::new(DisabledMailer))
        }
    }
}

fn build_message(from: &Mailbox, message: &OutboundMessage) -> Result<Message, MailError> {
    let builder = Message::builder()
        .from(from.clone())
        .to(message.to.parse()?)
        .subject(message.subject.clone());

    let email = match &message.attachment {
        Some(att) => builder.multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(message.body.clone()))
                .singlepart(
                    Attachment::new(att.filename.clone())
                        .body(att.bytes.clone(), ContentType::parse(&att.content_type)?),
                ),
        )?,
        None => builder.body(message.body.clone())?,
    };

    Ok(email)
}
