//! Ports between the domain core and the adapters.
//!
//! Inbound adapters depend on these traits; outbound adapters implement
//! them. Each port ships a `Fixture*` implementation used in tests and when
//! the server runs without its backing services.

mod admin_auth;
mod attribute_repository;
mod content_repository;
mod import_writer;
pub(crate) mod macros;
mod mail_sender;
mod order_repository;
mod payment_gateway;
mod product_repository;
mod promo_code_repository;

pub use admin_auth::{AdminAuthError, AdminAuthService, AdminCredentials};
pub use attribute_repository::{
    AttributeRepository, AttributeRepositoryError, FixtureAttributeRepository,
};
pub use content_repository::{ContentRepository, ContentRepositoryError, FixtureContentRepository};
pub use import_writer::{
    FixtureImportWriter, ImportWriter, ImportWriterError, ProductImportBundle,
};
pub use mail_sender::{FixtureMailSender, MailSender, MailSenderError, OutboundEmail};
pub use order_repository::{
    FixtureOrderRepository, NewOrder, NewOrderLine, Order, OrderRepository, OrderRepositoryError,
    OrderStatus,
};
pub use payment_gateway::{
    FixturePaymentGateway, PaymentGateway, PaymentGatewayError, PaymentLink, PaymentRequest,
};
pub use product_repository::{
    CatalogQuery, FixtureCatalogQuery, FixtureProductCommand, ProductCommand, ProductDetail,
    ProductFilter, ProductRepositoryError,
};
pub use promo_code_repository::{
    FixturePromoCodeRepository, PromoCodeDraft, PromoCodeRepository, PromoCodeRepositoryError,
};

#[cfg(test)]
pub use attribute_repository::MockAttributeRepository;
#[cfg(test)]
pub use content_repository::MockContentRepository;
#[cfg(test)]
pub use import_writer::MockImportWriter;
#[cfg(test)]
pub use mail_sender::MockMailSender;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
#[cfg(test)]
pub use product_repository::{MockCatalogQuery, MockProductCommand};
#[cfg(test)]
pub use promo_code_repository::MockPromoCodeRepository;
