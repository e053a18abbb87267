//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{MailSettings, PaymentSettings, ServerConfig};
pub use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{
    admin_attributes, admin_auth, admin_content, admin_import, admin_products, admin_promo_codes,
    catalog, checkout, health,
};
use crate::middleware::Trace;

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(8)),
        )
        .build();

    let admin = web::scope("/admin")
        .service(admin_auth::admin_login)
        .service(admin_auth::admin_logout)
        .service(admin_import::admin_import_products)
        .service(admin_products::admin_list_products)
        .service(admin_products::admin_create_product)
        .service(admin_products::admin_update_product)
        .service(admin_products::admin_delete_product)
        .service(admin_products::admin_set_product_attributes)
        .service(admin_products::admin_create_variant)
        .service(admin_products::admin_update_variant_stock)
        .service(admin_products::admin_delete_variant)
        .service(admin_attributes::admin_list_attributes)
        .service(admin_attributes::admin_create_attribute)
        .service(admin_attributes::admin_update_attribute)
        .service(admin_attributes::admin_delete_attribute)
        .service(admin_promo_codes::admin_list_promo_codes)
        .service(admin_promo_codes::admin_create_promo_code)
        .service(admin_promo_codes::admin_update_promo_code)
        .service(admin_promo_codes::admin_delete_promo_code)
        .service(admin_content::admin_set_banner)
        .service(admin_content::admin_list_gallery)
        .service(admin_content::admin_add_gallery_image)
        .service(admin_content::admin_update_gallery_image)
        .service(admin_content::admin_delete_gallery_image);

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(catalog::list_products)
        .service(catalog::get_product)
        .service(catalog::get_banner)
        .service(catalog::get_gallery)
        .service(checkout::post_checkout)
        .service(checkout::validate_promo_code)
        .service(admin);

    let app = App::new()
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(health::get_health);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when outbound clients cannot be built or
/// when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
