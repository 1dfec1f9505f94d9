//! Outbound email seam.
//!
//! Campaign sends and transactional mail go through the [`Mailer`] trait so
//! the HTTP layer never talks to a delivery provider directly. The default
//! [`LogMailer`] records each message through `tracing` without performing
//! network I/O; a real provider client can be dropped in behind the same
//! trait.

use async_trait::async_trait;

/// A single outbound email.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Delivery backend for outbound email.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message. Errors are reported per-recipient so a campaign
    /// can continue past individual failures.
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError>;
}

/// Error from a delivery attempt.
#[derive(Debug, thiserror::Error)]
#[error("mail delivery failed: {0}")]
pub struct MailerError(pub String);

/// Mailer that logs messages instead of delivering them.
///
/// Used in development and tests. Logs recipient and subject only; bodies may
/// contain unsubscribe tokens and are never logged.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        tracing::info!(to = %email.to, subject = %email.subject, "outbound email (log-only)");
        Ok(())
    }
}
