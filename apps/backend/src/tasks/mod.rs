//! Background jobs. Email is the only job kind.

pub mod email;
pub mod queue;

use thiserror::Error;

pub use email::{EmailJob, Mailer, SmtpMailer};
pub use queue::{TaskId, TaskQueue, TaskStatus, STATUS_RETENTION};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("invalid email address: {0}")]
    Address(String),
    #[error("failed to build email: {0}")]
    Message(String),
    #[error("mail transport failed: {0}")]
    Transport(String),
    #[error("task queue is full")]
    QueueFull,
    #[error("task queue is closed")]
    QueueClosed,
}
