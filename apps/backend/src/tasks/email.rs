use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::TaskError;
use crate::config::mail::SmtpConfig;
use crate::logging::pii::Redacted;

/// An HTML email waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

impl EmailJob {
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, job: &EmailJob) -> Result<(), TaskError>;
}

/// Delivers through an authenticated STARTTLS relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, TaskError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .map_err(|e| TaskError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let address: Address = config
            .username
            .parse()
            .map_err(|_| TaskError::Address(config.username.clone()))?;

        Ok(Self {
            transport,
            from: Mailbox::new(config.from_name.clone(), address),
        })
    }
}

pub(crate) fn build_message(from: &Mailbox, job: &EmailJob) -> Result<Message, TaskError> {
    let to: Mailbox = job
        .recipient
        .parse()
        .map_err(|_| TaskError::Address(job.recipient.clone()))?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(job.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(job.html_body.clone())
        .map_err(|e| TaskError::Message(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, job: &EmailJob) -> Result<(), TaskError> {
        let message = build_message(&self.from, job)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| TaskError::Transport(e.to_string()))?;
        info!(recipient = %Redacted(&job.recipient), "Email sent");
        Ok(())
    }
}
