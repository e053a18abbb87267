//! Product and variant entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::slug::is_valid_slug;

/// The two product families the store sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Carpet,
    Plant,
}

impl ProductKind {
    /// Stable wire token for the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Carpet => "carpet",
            Self::Plant => "plant",
        }
    }

    /// Parse a wire or CSV token. Only the two exact literals are accepted.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "carpet" => Some(Self::Carpet),
            "plant" => Some(Self::Plant),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for product and variant drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("slug is not a valid identifier: {slug}")]
    InvalidSlug { slug: String },
    #[error("{field} must not be negative")]
    NegativeAmount { field: &'static str },
}

/// A catalog product as the domain sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub kind: ProductKind,
    pub material: Option<String>,
    /// Base price in cents; superseded by variant prices when variants exist.
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    /// Meaningful only when the product has no variants.
    pub stock_quantity: i32,
    pub is_featured: bool,
    pub is_active: bool,
    pub has_variants: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating or updating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub kind: ProductKind,
    pub material: Option<String>,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub stock_quantity: i32,
    pub is_featured: bool,
    pub is_active: bool,
}

impl ProductDraft {
    /// Check structural invariants before the draft reaches persistence.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if self.name.trim().is_empty() {
            return Err(CatalogValidationError::EmptyField { field: "name" });
        }
        if !is_valid_slug(&self.slug) {
            return Err(CatalogValidationError::InvalidSlug {
                slug: self.slug.clone(),
            });
        }
        if self.price_cents < 0 {
            return Err(CatalogValidationError::NegativeAmount { field: "price" });
        }
        if self.compare_at_price_cents.is_some_and(|c| c < 0) {
            return Err(CatalogValidationError::NegativeAmount {
                field: "compare_at_price",
            });
        }
        if self.stock_quantity < 0 {
            return Err(CatalogValidationError::NegativeAmount {
                field: "stock_quantity",
            });
        }
        Ok(())
    }
}

/// A size/price/stock variant belonging to exactly one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub size_label: String,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub stock_quantity: i32,
    pub color_id: Option<Uuid>,
    pub is_active: bool,
    pub sort_order: i32,
}

/// A stored product photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub sort_order: i32,
}

/// Fields supplied when creating a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDraft {
    pub sku: String,
    pub size_label: String,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub stock_quantity: i32,
    pub color_id: Option<Uuid>,
    pub is_active: bool,
    pub sort_order: i32,
}

impl VariantDraft {
    /// Check structural invariants before the draft reaches persistence.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if self.size_label.trim().is_empty() {
            return Err(CatalogValidationError::EmptyField { field: "size_label" });
        }
        if self.sku.trim().is_empty() {
            return Err(CatalogValidationError::EmptyField { field: "sku" });
        }
        if self.price_cents < 0 {
            return Err(CatalogValidationError::NegativeAmount { field: "price" });
        }
        if self.stock_quantity < 0 {
            return Err(CatalogValidationError::NegativeAmount {
                field: "stock_quantity",
            });
        }
        Ok(())
    }
}
