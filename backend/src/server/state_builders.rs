//! Assembles the HTTP dependency bundle from configuration.
//!
//! Database-backed adapters are used when a pool is configured; otherwise
//! every port falls back to its fixture so the server still boots for local
//! front-end work and tests.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use crate::domain::CheckoutService;
use crate::domain::import::ImportService;
use crate::domain::ports::{
    AttributeRepository, CatalogQuery, ContentRepository, FixtureAttributeRepository,
    FixtureCatalogQuery, FixtureContentRepository, FixtureImportWriter, FixtureMailSender,
    FixtureOrderRepository, FixturePaymentGateway, FixtureProductCommand,
    FixturePromoCodeRepository, ImportWriter, MailSender, OrderRepository, PaymentGateway,
    ProductCommand, PromoCodeRepository,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::mail::HttpMailSender;
use crate::outbound::payment::HttpPaymentGateway;
use crate::outbound::persistence::{
    DieselAttributeRepository, DieselContentRepository, DieselImportWriter, DieselOrderRepository,
    DieselProductRepository, DieselPromoCodeRepository,
};

use super::config::ServerConfig;

struct Ports {
    catalog: Arc<dyn CatalogQuery>,
    products: Arc<dyn ProductCommand>,
    attributes: Arc<dyn AttributeRepository>,
    promo_codes: Arc<dyn PromoCodeRepository>,
    content: Arc<dyn ContentRepository>,
    orders: Arc<dyn OrderRepository>,
    import_writer: Arc<dyn ImportWriter>,
}

fn build_ports(config: &ServerConfig) -> Ports {
    match &config.db_pool {
        Some(pool) => {
            let products = Arc::new(DieselProductRepository::new(pool.clone()));
            Ports {
                catalog: products.clone(),
                products,
                attributes: Arc::new(DieselAttributeRepository::new(pool.clone())),
                promo_codes: Arc::new(DieselPromoCodeRepository::new(pool.clone())),
                content: Arc::new(DieselContentRepository::new(pool.clone())),
                orders: Arc::new(DieselOrderRepository::new(pool.clone())),
                import_writer: Arc::new(DieselImportWriter::new(pool.clone())),
            }
        }
        None => {
            warn!("no database configured; serving fixture data");
            Ports {
                catalog: Arc::new(FixtureCatalogQuery),
                products: Arc::new(FixtureProductCommand),
                attributes: Arc::new(FixtureAttributeRepository),
                promo_codes: Arc::new(FixturePromoCodeRepository),
                content: Arc::new(FixtureContentRepository),
                orders: Arc::new(FixtureOrderRepository),
                import_writer: Arc::new(FixtureImportWriter),
            }
        }
    }
}

fn build_payment_gateway(config: &ServerConfig) -> std::io::Result<Arc<dyn PaymentGateway>> {
    match &config.payment {
        Some(settings) => {
            let gateway =
                HttpPaymentGateway::new(settings.endpoint.clone(), settings.api_key.clone())
                    .map_err(|err| {
                        std::io::Error::other(format!("payment client construction failed: {err}"))
                    })?;
            Ok(Arc::new(gateway))
        }
        None => {
            warn!("no payment provider configured; minting fixture payment links");
            Ok(Arc::new(FixturePaymentGateway))
        }
    }
}

fn build_mail_sender(config: &ServerConfig) -> std::io::Result<Arc<dyn MailSender>> {
    match &config.mail {
        Some(settings) => {
            let sender = HttpMailSender::new(
                settings.endpoint.clone(),
                settings.api_key.clone(),
                settings.sender_address.clone(),
            )
            .map_err(|err| {
                std::io::Error::other(format!("mail client construction failed: {err}"))
            })?;
            Ok(Arc::new(sender))
        }
        None => {
            warn!("no mail provider configured; dropping transactional mail");
            Ok(Arc::new(FixtureMailSender))
        }
    }
}

/// Build the shared HTTP state from configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when an outbound HTTP client cannot be
/// constructed.
pub fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let ports = build_ports(config);
    let payments = build_payment_gateway(config)?;
    let mail = build_mail_sender(config)?;
    let admin_email = config
        .mail
        .as_ref()
        .and_then(|settings| settings.admin_email.clone());

    let checkout = CheckoutService::new(
        ports.catalog.clone(),
        ports.promo_codes.clone(),
        ports.orders,
        payments,
        mail,
        admin_email,
    );
    let import = ImportService::new(ports.import_writer, ports.attributes.clone());

    Ok(web::Data::new(HttpState {
        catalog: ports.catalog,
        products: ports.products,
        attributes: ports.attributes,
        promo_codes: ports.promo_codes,
        content: ports.content,
        checkout: Arc::new(checkout),
        import: Arc::new(import),
        auth: Arc::new(config.admin.clone()),
    }))
}
