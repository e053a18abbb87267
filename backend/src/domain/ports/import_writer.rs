//! Port for the bulk import's write side.
//!
//! The import service validates and resolves rows; this port persists one
//! product bundle per call. Each call is a single transaction, so a failure
//! leaves no partial product behind.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::{AttributeKind, ProductDraft, VariantDraft};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised while persisting an imported product.
    pub enum ImportWriterError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "import writer connection failed: {message}",
        /// The transaction failed and was rolled back.
        Write { message: String } =>
            "import write failed: {message}",
    }
}

/// Everything one CSV row produces: the product, its variants, its attribute
/// associations, and its image URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductImportBundle {
    pub product: ProductDraft,
    pub variants: Vec<VariantDraft>,
    pub attributes: Vec<(AttributeKind, Uuid)>,
    pub image_urls: Vec<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImportWriter: Send + Sync {
    /// Persist the bundle atomically and return the new product id.
    async fn create_product(
        &self,
        bundle: &ProductImportBundle,
    ) -> Result<Uuid, ImportWriterError>;
}

/// Fixture implementation rejecting imports.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImportWriter;

#[async_trait]
impl ImportWriter for FixtureImportWriter {
    async fn create_product(
        &self,
        _bundle: &ProductImportBundle,
    ) -> Result<Uuid, ImportWriterError> {
        Err(ImportWriterError::connection("no database configured"))
    }
}
