//! Port for order persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by order persistence adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "order repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "order repository query failed: {message}",
        /// The referenced order does not exist.
        NotFound { id: Uuid } =>
            "no order with id {id}",
    }
}

/// One priced line of a new order. Name and price are snapshots taken at
/// checkout so later catalog edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderLine {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub product_name: String,
    pub size_label: Option<String>,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

/// A fully priced order ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub note: Option<String>,
    pub lines: Vec<NewOrderLine>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub promo_code_id: Option<Uuid>,
}

/// A persisted order header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of an order from checkout onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingPayment,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist the order and its lines atomically.
    async fn create(&self, order: &NewOrder) -> Result<Order, OrderRepositoryError>;

    /// Attach the payment provider's reference once a payment link exists.
    async fn set_payment_reference(
        &self,
        order_id: Uuid,
        reference: &str,
    ) -> Result<(), OrderRepositoryError>;
}

/// Fixture implementation rejecting order creation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderRepository;

#[async_trait]
impl OrderRepository for FixtureOrderRepository {
    async fn create(&self, _order: &NewOrder) -> Result<Order, OrderRepositoryError> {
        Err(OrderRepositoryError::connection("no database configured"))
    }

    async fn set_payment_reference(
        &self,
        _order_id: Uuid,
        _reference: &str,
    ) -> Result<(), OrderRepositoryError> {
        Err(OrderRepositoryError::connection("no database configured"))
    }
}
