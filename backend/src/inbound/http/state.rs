//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AdminAuthService, AttributeRepository, CatalogQuery, ContentRepository,
    FixtureAttributeRepository, FixtureCatalogQuery, FixtureContentRepository,
    FixtureImportWriter, FixtureMailSender, FixtureOrderRepository, FixturePaymentGateway,
    FixtureProductCommand, FixturePromoCodeRepository, ProductCommand, PromoCodeRepository,
};
use crate::domain::{CheckoutService, import::ImportService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<dyn CatalogQuery>,
    pub products: Arc<dyn ProductCommand>,
    pub attributes: Arc<dyn AttributeRepository>,
    pub promo_codes: Arc<dyn PromoCodeRepository>,
    pub content: Arc<dyn ContentRepository>,
    pub checkout: Arc<CheckoutService>,
    pub import: Arc<ImportService>,
    pub auth: Arc<AdminAuthService>,
}

impl HttpState {
    /// State backed entirely by fixtures. Used in handler tests and when the
    /// server runs without a database.
    pub fn fixtures(auth: AdminAuthService) -> Self {
        let catalog = Arc::new(FixtureCatalogQuery);
        let promo_codes = Arc::new(FixturePromoCodeRepository);
        let attributes = Arc::new(FixtureAttributeRepository);
        let checkout = CheckoutService::new(
            catalog.clone(),
            promo_codes.clone(),
            Arc::new(FixtureOrderRepository),
            Arc::new(FixturePaymentGateway),
            Arc::new(FixtureMailSender),
            None,
        );
        let import = ImportService::new(Arc::new(FixtureImportWriter), attributes.clone());
        Self {
            catalog,
            products: Arc::new(FixtureProductCommand),
            attributes,
            promo_codes,
            content: Arc::new(FixtureContentRepository),
            checkout: Arc::new(checkout),
            import: Arc::new(import),
            auth: Arc::new(auth),
        }
    }
}
