//! Reqwest-backed transactional mail adapter.
//!
//! Posts rendered messages to an HTTP mail API. Checkout treats mail
//! failures as non-fatal, so this adapter only has to classify errors, not
//! retry them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{MailSender, MailSenderError, OutboundEmail};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire shape of the provider's send request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageDto<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
}

/// Mail adapter performing HTTP POST requests against one endpoint.
pub struct HttpMailSender {
    client: Client,
    endpoint: Url,
    api_key: String,
    sender_address: String,
}

impl HttpMailSender {
    /// Build an adapter sending from the given address.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: String,
        sender_address: String,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DEFAULT_REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            sender_address,
        })
    }
}

#[async_trait]
impl MailSender for HttpMailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailSenderError> {
        let dto = SendMessageDto {
            from: &self.sender_address,
            to: &email.to,
            subject: &email.subject,
            html_body: &email.html_body,
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&dto)
            .send()
            .await
            .map_err(|error| MailSenderError::unavailable(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = format!("status {}", status.as_u16());
        if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
            Err(MailSenderError::rejected(message))
        } else {
            Err(MailSenderError::unavailable(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_dto_serialises_camel_case() {
        let dto = SendMessageDto {
            from: "orders@fernloom.example",
            to: "ada@example.com",
            subject: "Order confirmation",
            html_body: "<p>Thank you</p>",
        };
        let json = serde_json::to_value(&dto).expect("dto should serialise");
        assert_eq!(json["from"], "orders@fernloom.example");
        assert_eq!(json["htmlBody"], "<p>Thank you</p>");
    }
}
