//! Port for transactional email.

use async_trait::async_trait;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by the mail adapter.
    pub enum MailSenderError {
        /// The mail provider could not be reached.
        Unavailable { message: String } =>
            "mail provider unavailable: {message}",
        /// The mail provider rejected the message.
        Rejected { message: String } =>
            "mail provider rejected the message: {message}",
    }
}

/// A rendered message ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailSenderError>;
}

/// Fixture sender that drops messages. Checkout treats mail failures as
/// non-fatal, so a silent sink is a faithful stand-in.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMailSender;

#[async_trait]
impl MailSender for FixtureMailSender {
    async fn send(&self, _email: &OutboundEmail) -> Result<(), MailSenderError> {
        Ok(())
    }
}
