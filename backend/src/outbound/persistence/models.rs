//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain. Conversion into domain types happens here so
//! repository adapters stay thin.
//!
//! The nine attribute reference tables are queried as plain tuples rather
//! than row structs, since a `Selectable` derive binds to a single table.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::catalog::{
    Banner, DiscountType, GalleryImage, Product, ProductImage, ProductKind, PromoCode, Variant,
};
use crate::domain::ports::{Order, OrderStatus};

use super::schema::{
    banners, gallery_images, order_items, orders, product_images, product_variants, products,
    promo_codes,
};

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub material: Option<String>,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub stock_quantity: i32,
    pub is_featured: bool,
    pub is_active: bool,
    pub has_variants: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    pub fn into_domain(self) -> Result<Product, String> {
        let kind = ProductKind::from_token(&self.kind)
            .ok_or_else(|| format!("unknown product kind '{}' for product {}", self.kind, self.id))?;
        Ok(Product {
            id: self.id,
            slug: self.slug,
            name: self.name,
            description: self.description,
            kind,
            material: self.material,
            price_cents: self.price_cents,
            compare_at_price_cents: self.compare_at_price_cents,
            stock_quantity: self.stock_quantity,
            is_featured: self.is_featured,
            is_active: self.is_active,
            has_variants: self.has_variants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating product records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub id: Uuid,
    pub slug: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub kind: &'a str,
    pub material: Option<&'a str>,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub stock_quantity: i32,
    pub is_featured: bool,
    pub is_active: bool,
    pub has_variants: bool,
}

/// Changeset struct for updating product records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub(crate) struct ProductChangeset<'a> {
    pub slug: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub kind: &'a str,
    pub material: Option<&'a str>,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub stock_quantity: i32,
    pub is_featured: bool,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the product_variants table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = product_variants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VariantRow {
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

impl From<VariantRow> for Variant {
    fn from(row: VariantRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            sku: row.sku,
            size_label: row.size_label,
            price_cents: row.price_cents,
            compare_at_price_cents: row.compare_at_price_cents,
            stock_quantity: row.stock_quantity,
            color_id: row.color_id,
            is_active: row.is_active,
            sort_order: row.sort_order,
        }
    }
}

/// Insertable struct for creating variant records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = product_variants)]
pub(crate) struct NewVariantRow<'a> {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku: &'a str,
    pub size_label: &'a str,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub stock_quantity: i32,
    pub color_id: Option<Uuid>,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Row struct for reading from the product_images table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = product_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductImageRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub sort_order: i32,
}

impl From<ProductImageRow> for ProductImage {
    fn from(row: ProductImageRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            url: row.url,
            sort_order: row.sort_order,
        }
    }
}

/// Insertable struct for creating product image records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = product_images)]
pub(crate) struct NewProductImageRow<'a> {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: &'a str,
    pub sort_order: i32,
}

/// Row struct for reading from the promo_codes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = promo_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PromoCodeRow {
    pub id: Uuid,
    pub code: String,
    pub discount_type: String,
    pub discount_value: i64,
    pub min_purchase_cents: Option<i64>,
    pub max_uses: Option<i32>,
    pub per_customer_cap: Option<i32>,
    pub times_used: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl PromoCodeRow {
    pub fn into_domain(self) -> Result<PromoCode, String> {
        let discount_type = DiscountType::from_token(&self.discount_type).ok_or_else(|| {
            format!(
                "unknown discount type '{}' for promo code {}",
                self.discount_type, self.id
            )
        })?;
        Ok(PromoCode {
            id: self.id,
            code: self.code,
            discount_type,
            discount_value: self.discount_value,
            min_purchase_cents: self.min_purchase_cents,
            max_uses: self.max_uses,
            per_customer_cap: self.per_customer_cap,
            times_used: self.times_used,
            is_active: self.is_active,
            expires_at: self.expires_at,
        })
    }
}

/// Insertable struct for creating promo code records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = promo_codes)]
pub(crate) struct NewPromoCodeRow<'a> {
    pub id: Uuid,
    pub code: &'a str,
    pub discount_type: &'a str,
    pub discount_value: i64,
    pub min_purchase_cents: Option<i64>,
    pub max_uses: Option<i32>,
    pub per_customer_cap: Option<i32>,
    pub times_used: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Changeset struct for updating promo code records. Leaves `times_used`
/// alone so edits do not reset redemption accounting.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = promo_codes)]
pub(crate) struct PromoCodeChangeset<'a> {
    pub code: &'a str,
    pub discount_type: &'a str,
    pub discount_value: i64,
    pub min_purchase_cents: Option<Option<i64>>,
    pub max_uses: Option<Option<i32>>,
    pub per_customer_cap: Option<Option<i32>>,
    pub is_active: bool,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

/// Row struct for reading order headers.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub total_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_domain(self) -> Result<Order, String> {
        let status = match self.status.as_str() {
            "pending_payment" => OrderStatus::PendingPayment,
            "paid" => OrderStatus::Paid,
            "cancelled" => OrderStatus::Cancelled,
            other => return Err(format!("unknown order status '{other}' for order {}", self.id)),
        };
        Ok(Order {
            id: self.id,
            reference: self.reference,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            total_cents: self.total_cents,
            status,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating order headers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub reference: &'a str,
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub customer_phone: Option<&'a str>,
    pub shipping_address: &'a str,
    pub note: Option<&'a str>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub promo_code_id: Option<Uuid>,
    pub status: &'a str,
}

/// Insertable struct for creating order lines.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_items)]
pub(crate) struct NewOrderItemRow<'a> {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub product_name: &'a str,
    pub size_label: Option<&'a str>,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

/// Row struct for reading from the gallery_images table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = gallery_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GalleryImageRow {
    pub id: Uuid,
    pub url: String,
    pub caption: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl From<GalleryImageRow> for GalleryImage {
    fn from(row: GalleryImageRow) -> Self {
        Self {
            id: row.id,
            url: row.url,
            caption: row.caption,
            sort_order: row.sort_order,
            is_active: row.is_active,
        }
    }
}

/// Insertable struct for creating gallery image records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = gallery_images)]
pub(crate) struct NewGalleryImageRow<'a> {
    pub id: Uuid,
    pub url: &'a str,
    pub caption: Option<&'a str>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Changeset struct for updating gallery image records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = gallery_images)]
pub(crate) struct GalleryImageChangeset<'a> {
    pub url: &'a str,
    pub caption: Option<Option<&'a str>>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Row struct for reading from the banners table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = banners)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BannerRow {
    pub id: Uuid,
    pub headline: String,
    pub subtext: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_active: bool,
}

impl From<BannerRow> for Banner {
    fn from(row: BannerRow) -> Self {
        Self {
            id: row.id,
            headline: row.headline,
            subtext: row.subtext,
            image_url: row.image_url,
            link_url: row.link_url,
            is_active: row.is_active,
        }
    }
}

/// Insertable struct for creating banner records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = banners)]
pub(crate) struct NewBannerRow<'a> {
    pub id: Uuid,
    pub headline: &'a str,
    pub subtext: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub link_url: Option<&'a str>,
    pub is_active: bool,
}
