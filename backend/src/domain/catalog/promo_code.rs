//! Promo codes and discount arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a promo code reduces the order subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `discount_value` is a whole-number percentage of the subtotal.
    Percentage,
    /// `discount_value` is a fixed amount in cents.
    Fixed,
}

impl DiscountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "percentage" => Some(Self::Percentage),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Reasons a promo code cannot be applied to an order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromoRejection {
    #[error("promo code is not active")]
    Inactive,
    #[error("promo code expired")]
    Expired,
    #[error("promo code has reached its usage limit")]
    Exhausted,
    #[error("order subtotal below the minimum purchase of {min_purchase_cents} cents")]
    BelowMinimum { min_purchase_cents: i64 },
}

/// A promo code row as the domain sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    /// Percent for [`DiscountType::Percentage`], cents for [`DiscountType::Fixed`].
    pub discount_value: i64,
    pub min_purchase_cents: Option<i64>,
    pub max_uses: Option<i32>,
    pub per_customer_cap: Option<i32>,
    pub times_used: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl PromoCode {
    /// Check redeemability against the clock and usage counters.
    pub fn check_redeemable(&self, now: DateTime<Utc>) -> Result<(), PromoRejection> {
        if !self.is_active {
            return Err(PromoRejection::Inactive);
        }
        if self.expires_at.is_some_and(|deadline| deadline <= now) {
            return Err(PromoRejection::Expired);
        }
        if self
            .max_uses
            .is_some_and(|limit| self.times_used >= limit)
        {
            return Err(PromoRejection::Exhausted);
        }
        Ok(())
    }

    /// Compute the discount in cents for the given subtotal, enforcing the
    /// minimum purchase. The discount never exceeds the subtotal.
    pub fn discount_for(
        &self,
        subtotal_cents: i64,
        now: DateTime<Utc>,
    ) -> Result<i64, PromoRejection> {
        self.check_redeemable(now)?;
        if let Some(min) = self.min_purchase_cents {
            if subtotal_cents < min {
                return Err(PromoRejection::BelowMinimum {
                    min_purchase_cents: min,
                });
            }
        }
        let discount = match self.discount_type {
            DiscountType::Percentage => subtotal_cents * self.discount_value / 100,
            DiscountType::Fixed => self.discount_value,
        };
        Ok(discount.clamp(0, subtotal_cents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code(discount_type: DiscountType, value: i64) -> PromoCode {
        PromoCode {
            id: Uuid::new_v4(),
            code: "SPRING10".into(),
            discount_type,
            discount_value: value,
            min_purchase_cents: None,
            max_uses: None,
            per_customer_cap: None,
            times_used: 0,
            is_active: true,
            expires_at: None,
        }
    }

    #[test]
    fn percentage_discount_rounds_down() {
        let promo = code(DiscountType::Percentage, 10);
        assert_eq!(promo.discount_for(10_999, Utc::now()), Ok(1099));
    }

    #[test]
    fn fixed_discount_is_capped_at_subtotal() {
        let promo = code(DiscountType::Fixed, 5_000);
        assert_eq!(promo.discount_for(3_000, Utc::now()), Ok(3_000));
    }

    #[test]
    fn minimum_purchase_is_enforced() {
        let mut promo = code(DiscountType::Fixed, 500);
        promo.min_purchase_cents = Some(10_000);
        assert_eq!(
            promo.discount_for(9_999, Utc::now()),
            Err(PromoRejection::BelowMinimum {
                min_purchase_cents: 10_000
            })
        );
        assert_eq!(promo.discount_for(10_000, Utc::now()), Ok(500));
    }

    #[test]
    fn expired_code_is_rejected() {
        let mut promo = code(DiscountType::Fixed, 500);
        promo.expires_at = Some(Utc::now() - Duration::hours(1));
        assert_eq!(
            promo.discount_for(10_000, Utc::now()),
            Err(PromoRejection::Expired)
        );
    }

    #[test]
    fn exhausted_code_is_rejected() {
        let mut promo = code(DiscountType::Fixed, 500);
        promo.max_uses = Some(3);
        promo.times_used = 3;
        assert_eq!(
            promo.discount_for(10_000, Utc::now()),
            Err(PromoRejection::Exhausted)
        );
    }

    #[test]
    fn inactive_code_is_rejected() {
        let mut promo = code(DiscountType::Fixed, 500);
        promo.is_active = false;
        assert_eq!(
            promo.discount_for(10_000, Utc::now()),
            Err(PromoRejection::Inactive)
        );
    }
}
