//! Reqwest-backed payment gateway adapter.
//!
//! Owns transport details only: request serialisation, authentication,
//! timeout and HTTP error mapping, and JSON decoding of the minted link.
//! The provider's hosted-payment API takes one POST per link.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{PaymentGateway, PaymentGatewayError, PaymentLink, PaymentRequest};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Wire shape of the provider's create-link request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentLinkRequestDto<'a> {
    order_id: String,
    order_reference: &'a str,
    amount_cents: i64,
    customer_email: &'a str,
    description: &'a str,
}

impl<'a> From<&'a PaymentRequest> for PaymentLinkRequestDto<'a> {
    fn from(request: &'a PaymentRequest) -> Self {
        Self {
            order_id: request.order_id.to_string(),
            order_reference: &request.order_reference,
            amount_cents: request.amount_cents,
            customer_email: &request.customer_email,
            description: &request.description,
        }
    }
}

/// Payment gateway adapter performing HTTP POST requests against one endpoint.
pub struct HttpPaymentGateway {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl HttpPaymentGateway {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, api_key: String) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, api_key, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(
        endpoint: Url,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_payment_link(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentLink, PaymentGatewayError> {
        let dto = PaymentLinkRequestDto::from(request);
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&dto)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        serde_json::from_slice(body.as_ref()).map_err(|error| {
            PaymentGatewayError::rejected(format!("invalid payment link payload: {error}"))
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    PaymentGatewayError::unavailable(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    if status.is_client_error() {
        PaymentGatewayError::rejected(message)
    } else {
        PaymentGatewayError::unavailable(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
