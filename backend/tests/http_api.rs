//! End-to-end HTTP tests over the fixture-backed application.
//!
//! Exercises the public surface the way a browser would: anonymous
//! storefront reads, the admin login handshake, and the CSV import upload.
//! Runs entirely on fixtures, so no database or external provider is needed.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;

use fernloom::domain::ports::{AdminAuthService, AdminCredentials};
use fernloom::inbound::http::state::HttpState;
use fernloom::inbound::http::{
    admin_attributes, admin_auth, admin_content, admin_import, admin_products, admin_promo_codes,
    catalog, checkout, health,
};

const MULTIPART_BOUNDARY: &str = "fernloom-test-boundary";

fn fixture_state() -> web::Data<HttpState> {
    web::Data::new(HttpState::fixtures(AdminAuthService::new(
        AdminCredentials::try_from_parts("admin", "s3cret"),
    )))
}

/// Mirror of the production routing tree, minus TLS-only cookie settings.
async fn spawn_app()
-> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    let admin = web::scope("/admin")
        .service(admin_auth::admin_login)
        .service(admin_auth::admin_logout)
        .service(admin_import::admin_import_products)
        .service(admin_products::admin_list_products)
        .service(admin_products::admin_create_product)
        .service(admin_attributes::admin_list_attributes)
        .service(admin_promo_codes::admin_list_promo_codes)
        .service(admin_content::admin_list_gallery);

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(catalog::list_products)
        .service(catalog::get_product)
        .service(catalog::get_banner)
        .service(catalog::get_gallery)
        .service(checkout::post_checkout)
        .service(checkout::validate_promo_code)
        .service(admin);

    test::init_service(
        App::new()
            .app_data(fixture_state())
            .service(api)
            .service(health::get_health),
    )
    .await
}

/// Encode one `file` field holding the given CSV bytes.
fn multipart_csv(csv: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"products.csv\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(csv.as_bytes());
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

async fn login(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> actix_web::cookie::Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/admin/login")
            .set_json(json!({"username": "admin", "password": "s3cret"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

#[actix_web::test]
async fn health_is_reachable_without_a_session() {
    let app = spawn_app().await;
    let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn storefront_listing_needs_no_login() {
    let app = spawn_app().await;
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/products").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn unknown_product_slug_is_not_found() {
    let app = spawn_app().await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/products/missing-rug")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn admin_routes_reject_anonymous_callers() {
    let app = spawn_app().await;
    for uri in [
        "/api/v1/admin/products",
        "/api/v1/admin/promo-codes",
        "/api/v1/admin/attributes/category",
    ] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[actix_web::test]
async fn bad_credentials_do_not_start_a_session() {
    let app = spawn_app().await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/login")
            .set_json(json!({"username": "admin", "password": "wrong"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(
        !res.response()
            .cookies()
            .any(|cookie| cookie.name() == "session")
    );
}

#[actix_web::test]
async fn login_opens_the_admin_panel() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/admin/products")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn logout_closes_the_session() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/logout")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn import_upload_returns_a_per_row_report() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    // Row 2 is valid but the fixture writer has no database behind it; row 3
    // fails validation outright.
    let csv = "name,product_type,sizes,prices\n\
               Persian Rug,carpet,160x230,1500\n\
               Broken,furniture,160x230,1500\n";
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/products/import")
            .cookie(cookie)
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            ))
            .set_payload(multipart_csv(csv))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["successCount"], 0);
    assert_eq!(body["errorCount"], 2);
    assert_eq!(body["errors"][0]["field"], "database");
    assert_eq!(body["errors"][1]["field"], "product_type");
}

#[actix_web::test]
async fn import_without_a_file_field_is_a_bad_request() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"other\"\r\n\r\nhello");
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/products/import")
            .cookie(cookie)
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            ))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn import_requires_a_session() {
    let app = spawn_app().await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/admin/products/import")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            ))
            .set_payload(multipart_csv("name,product_type,sizes,prices\n"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn empty_cart_checkout_is_rejected() {
    let app = spawn_app().await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/checkout")
            .set_json(json!({
                "customerName": "Ada Lovelace",
                "customerEmail": "ada@example.com",
                "customerPhone": null,
                "shippingAddress": "1 Analytical Way",
                "note": null,
                "lines": [],
                "promoCode": null
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "cart is empty");
}

#[actix_web::test]
async fn checkout_of_a_vanished_product_is_not_found() {
    let app = spawn_app().await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/checkout")
            .set_json(json!({
                "customerName": "Ada Lovelace",
                "customerEmail": "ada@example.com",
                "customerPhone": null,
                "shippingAddress": "1 Analytical Way",
                "note": null,
                "lines": [{
                    "productId": "4b4d9cf6-7c71-4b38-9b2a-54f1f3a9d001",
                    "variantId": null,
                    "quantity": 1
                }],
                "promoCode": null
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn negative_subtotal_fails_promo_validation() {
    let app = spawn_app().await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/promo-codes/validate")
            .set_json(json!({"code": "SPRING10", "subtotalCents": -5}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
