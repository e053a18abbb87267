//! Catalog entities: products, variants, attributes, promo codes, content.

mod attribute;
mod content;
mod product;
mod promo_code;

pub use attribute::{Attribute, AttributeDraft, AttributeKind, AttributeRef};
pub use content::{Banner, BannerDraft, GalleryImage, GalleryImageDraft};
pub use product::{
    CatalogValidationError, Product, ProductDraft, ProductImage, ProductKind, Variant,
    VariantDraft,
};
pub use promo_code::{DiscountType, PromoCode, PromoRejection};
