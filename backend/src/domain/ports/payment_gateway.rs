//! Port for the hosted-payment provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by the payment gateway adapter.
    pub enum PaymentGatewayError {
        /// The provider could not be reached.
        Unavailable { message: String } =>
            "payment provider unavailable: {message}",
        /// The provider rejected the request.
        Rejected { message: String } =>
            "payment provider rejected the request: {message}",
    }
}

/// What the provider needs to mint a hosted payment page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub order_id: Uuid,
    pub order_reference: String,
    pub amount_cents: i64,
    pub customer_email: String,
    pub description: String,
}

/// A minted hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentLink {
    /// Provider-side identifier, stored on the order.
    pub reference: String,
    /// URL the customer is redirected to.
    pub url: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted payment page for the order.
    async fn create_payment_link(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentLink, PaymentGatewayError>;
}

/// Fixture gateway minting deterministic links; used when no provider is
/// configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentGateway;

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn create_payment_link(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentLink, PaymentGatewayError> {
        Ok(PaymentLink {
            reference: format!("fixture-{}", request.order_id),
            url: format!("https://pay.example.invalid/{}", request.order_reference),
        })
    }
}
