//! Reference-table attributes and their product associations.
//!
//! Nine structurally identical reference tables describe carpets (category,
//! color, shape, space) and plants (type, size, light, care, pet safety).
//! Colors are shared: they describe carpet looks and double as variant
//! colors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{CatalogValidationError, ProductKind};
use crate::domain::slug::is_valid_slug;

/// Discriminator for the nine attribute reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Category,
    Color,
    Shape,
    Space,
    PlantType,
    PlantSize,
    PlantLight,
    PlantCare,
    PlantPetSafety,
}

impl AttributeKind {
    /// All kinds, in stable order.
    pub const ALL: [Self; 9] = [
        Self::Category,
        Self::Color,
        Self::Shape,
        Self::Space,
        Self::PlantType,
        Self::PlantSize,
        Self::PlantLight,
        Self::PlantCare,
        Self::PlantPetSafety,
    ];

    /// Stable wire token, also used as the admin URL path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Color => "color",
            Self::Shape => "shape",
            Self::Space => "space",
            Self::PlantType => "plant_type",
            Self::PlantSize => "plant_size",
            Self::PlantLight => "plant_light",
            Self::PlantCare => "plant_care",
            Self::PlantPetSafety => "plant_pet_safety",
        }
    }

    /// Parse a wire token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == token)
    }

    /// The CSV column carrying association tokens for this kind.
    pub fn csv_column(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Color => "colors",
            Self::Shape => "shapes",
            Self::Space => "spaces",
            Self::PlantType => "plant_types",
            Self::PlantSize => "plant_sizes",
            Self::PlantLight => "plant_light",
            Self::PlantCare => "plant_care",
            Self::PlantPetSafety => "plant_pet_safety",
        }
    }

    /// Attribute kinds a product of the given family may be associated with.
    pub fn applicable_to(kind: ProductKind) -> &'static [Self] {
        match kind {
            ProductKind::Carpet => &[Self::Category, Self::Color, Self::Shape, Self::Space],
            ProductKind::Plant => &[
                Self::PlantType,
                Self::PlantSize,
                Self::PlantLight,
                Self::PlantCare,
                Self::PlantPetSafety,
                Self::Color,
            ],
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A full attribute row from one of the reference tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub id: Uuid,
    pub kind: AttributeKind,
    pub slug: String,
    pub name: String,
    pub is_active: bool,
    pub sort_order: i32,
}

/// The subset of an attribute the import resolver needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRef {
    pub kind: AttributeKind,
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

/// Fields supplied when creating or updating an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDraft {
    pub slug: String,
    pub name: String,
    pub is_active: bool,
    pub sort_order: i32,
}

impl AttributeDraft {
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
        Ok(())
    }
}
