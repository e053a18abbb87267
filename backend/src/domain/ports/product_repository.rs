//! Catalog read and product admin command ports.
//!
//! The read side serves the storefront listing and detail pages; the command
//! side backs the admin panel CRUD and the inventory editor. Persistence
//! details stay behind the hexagonal boundary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::{
    Attribute, AttributeKind, Product, ProductDraft, ProductImage, ProductKind, Variant,
    VariantDraft,
};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by product persistence adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "product repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "product repository query failed: {message}",
        /// The referenced product or variant does not exist.
        NotFound { message: String } =>
            "product not found: {message}",
        /// Another product already uses this slug.
        DuplicateSlug { slug: String } =>
            "slug already in use: {slug}",
    }
}

/// Listing filters for the storefront and the admin product table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub kind: Option<ProductKind>,
    /// Narrow to products associated with this attribute slug.
    pub attribute: Option<(AttributeKind, String)>,
    pub featured_only: bool,
    /// Admin views include inactive products; the storefront never does.
    pub include_inactive: bool,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            kind: None,
            attribute: None,
            featured_only: false,
            include_inactive: false,
            limit: 24,
            offset: 0,
        }
    }
}

/// A product with everything the detail page needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub product: Product,
    pub variants: Vec<Variant>,
    pub images: Vec<ProductImage>,
    pub attributes: Vec<Attribute>,
}

/// Read-side port for catalog browsing and checkout re-pricing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// List products matching the filter, newest first.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Fetch a product with variants, images, and attributes by slug.
    async fn find_detail_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ProductDetail>, ProductRepositoryError>;

    /// Fetch a bare product row by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, ProductRepositoryError>;

    /// Fetch a bare variant row by id.
    async fn find_variant(&self, id: Uuid) -> Result<Option<Variant>, ProductRepositoryError>;
}

/// Command port for admin product management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCommand: Send + Sync {
    async fn create(&self, draft: &ProductDraft) -> Result<Product, ProductRepositoryError>;

    async fn update(
        &self,
        id: Uuid,
        draft: &ProductDraft,
    ) -> Result<Product, ProductRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), ProductRepositoryError>;

    async fn create_variant(
        &self,
        product_id: Uuid,
        draft: &VariantDraft,
    ) -> Result<Variant, ProductRepositoryError>;

    /// Inventory editor: set the stock for one variant.
    async fn update_variant_stock(
        &self,
        variant_id: Uuid,
        stock_quantity: i32,
    ) -> Result<(), ProductRepositoryError>;

    async fn delete_variant(&self, variant_id: Uuid) -> Result<(), ProductRepositoryError>;

    /// Replace a product's associations for one attribute kind.
    async fn set_attributes(
        &self,
        product_id: Uuid,
        kind: AttributeKind,
        attribute_ids: &[Uuid],
    ) -> Result<(), ProductRepositoryError>;
}

/// Fixture implementation for handler tests that do not touch the catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogQuery;

#[async_trait]
impl CatalogQuery for FixtureCatalogQuery {
    async fn list(&self, _filter: &ProductFilter) -> Result<Vec<Product>, ProductRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_detail_by_slug(
        &self,
        _slug: &str,
    ) -> Result<Option<ProductDetail>, ProductRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(None)
    }

    async fn find_variant(&self, _id: Uuid) -> Result<Option<Variant>, ProductRepositoryError> {
        Ok(None)
    }
}

/// Fixture implementation rejecting every admin mutation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductCommand;

#[async_trait]
impl ProductCommand for FixtureProductCommand {
    async fn create(&self, _draft: &ProductDraft) -> Result<Product, ProductRepositoryError> {
        Err(ProductRepositoryError::connection("no database configured"))
    }

    async fn update(
        &self,
        _id: Uuid,
        _draft: &ProductDraft,
    ) -> Result<Product, ProductRepositoryError> {
        Err(ProductRepositoryError::connection("no database configured"))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), ProductRepositoryError> {
        Err(ProductRepositoryError::connection("no database configured"))
    }

    async fn create_variant(
        &self,
        _product_id: Uuid,
        _draft: &VariantDraft,
    ) -> Result<Variant, ProductRepositoryError> {
        Err(ProductRepositoryError::connection("no database configured"))
    }

    async fn update_variant_stock(
        &self,
        _variant_id: Uuid,
        _stock_quantity: i32,
    ) -> Result<(), ProductRepositoryError> {
        Err(ProductRepositoryError::connection("no database configured"))
    }

    async fn delete_variant(&self, _variant_id: Uuid) -> Result<(), ProductRepositoryError> {
        Err(ProductRepositoryError::connection("no database configured"))
    }

    async fn set_attributes(
        &self,
        _product_id: Uuid,
        _kind: AttributeKind,
        _attribute_ids: &[Uuid],
    ) -> Result<(), ProductRepositoryError> {
        Err(ProductRepositoryError::connection("no database configured"))
    }
}
