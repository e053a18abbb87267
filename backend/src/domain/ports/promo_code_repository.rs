//! Port for promo code storage and redemption accounting.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{DiscountType, PromoCode};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by promo code persistence adapters.
    pub enum PromoCodeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "promo code repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "promo code repository query failed: {message}",
        /// The referenced promo code does not exist.
        NotFound { id: Uuid } =>
            "no promo code with id {id}",
        /// Another promo code already uses this code string.
        DuplicateCode { code: String } =>
            "promo code already exists: {code}",
    }
}

/// Fields supplied when creating or updating a promo code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeDraft {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub min_purchase_cents: Option<i64>,
    pub max_uses: Option<i32>,
    pub per_customer_cap: Option<i32>,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromoCodeRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<PromoCode>, PromoCodeRepositoryError>;

    /// Lookup is case-insensitive on the code string.
    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<PromoCode>, PromoCodeRepositoryError>;

    async fn create(&self, draft: &PromoCodeDraft) -> Result<PromoCode, PromoCodeRepositoryError>;

    async fn update(
        &self,
        id: Uuid,
        draft: &PromoCodeDraft,
    ) -> Result<PromoCode, PromoCodeRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), PromoCodeRepositoryError>;

    /// Bump the usage counter after a successful checkout.
    async fn record_redemption(&self, id: Uuid) -> Result<(), PromoCodeRepositoryError>;
}

/// Fixture implementation that knows no codes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePromoCodeRepository;

#[async_trait]
impl PromoCodeRepository for FixturePromoCodeRepository {
    async fn list(&self) -> Result<Vec<PromoCode>, PromoCodeRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_code(
        &self,
        _code: &str,
    ) -> Result<Option<PromoCode>, PromoCodeRepositoryError> {
        Ok(None)
    }

    async fn create(
        &self,
        _draft: &PromoCodeDraft,
    ) -> Result<PromoCode, PromoCodeRepositoryError> {
        Err(PromoCodeRepositoryError::connection(
            "no database configured",
        ))
    }

    async fn update(
        &self,
        _id: Uuid,
        _draft: &PromoCodeDraft,
    ) -> Result<PromoCode, PromoCodeRepositoryError> {
        Err(PromoCodeRepositoryError::connection(
            "no database configured",
        ))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), PromoCodeRepositoryError> {
        Err(PromoCodeRepositoryError::connection(
            "no database configured",
        ))
    }

    async fn record_redemption(&self, _id: Uuid) -> Result<(), PromoCodeRepositoryError> {
        Ok(())
    }
}
