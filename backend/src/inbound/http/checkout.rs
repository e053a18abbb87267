//! Checkout and promo code endpoints.
//!
//! ```text
//! POST /api/v1/checkout
//! POST /api/v1/promo-codes/validate
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{CheckoutInput, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Response returned after an order is placed.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    #[schema(example = "FL-1001")]
    pub order_reference: String,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    /// Hosted payment page the customer is redirected to.
    pub payment_url: String,
}

/// Request body for promo validation.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePromoRequest {
    #[schema(example = "SPRING10")]
    pub code: String,
    pub subtotal_cents: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePromoResponse {
    pub code: String,
    pub discount_cents: i64,
    pub total_cents: i64,
}

/// Place an order from cart lines and contact details.
#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    request_body = CheckoutRequestSchema,
    responses(
        (status = 200, description = "Order placed", body = CheckoutResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Product no longer available", body = Error),
        (status = 409, description = "Insufficient stock", body = Error),
        (status = 503, description = "Payment provider unavailable", body = Error)
    ),
    tags = ["checkout"],
    operation_id = "checkout"
)]
#[post("/checkout")]
pub async fn post_checkout(
    state: web::Data<HttpState>,
    body: web::Json<CheckoutInput>,
) -> ApiResult<HttpResponse> {
    let outcome = state.checkout.checkout(&body).await?;
    Ok(HttpResponse::Ok().json(CheckoutResponse {
        order_id: outcome.order.id,
        order_reference: outcome.order.reference,
        subtotal_cents: outcome.subtotal_cents,
        discount_cents: outcome.discount_cents,
        total_cents: outcome.total_cents,
        payment_url: outcome.payment_url,
    }))
}

/// Check a promo code against a cart subtotal.
#[utoipa::path(
    post,
    path = "/api/v1/promo-codes/validate",
    request_body = ValidatePromoRequest,
    responses(
        (status = 200, description = "Code accepted", body = ValidatePromoResponse),
        (status = 400, description = "Unknown or not redeemable", body = Error)
    ),
    tags = ["checkout"],
    operation_id = "validatePromoCode"
)]
#[post("/promo-codes/validate")]
pub async fn validate_promo_code(
    state: web::Data<HttpState>,
    body: web::Json<ValidatePromoRequest>,
) -> ApiResult<HttpResponse> {
    if body.subtotal_cents < 0 {
        return Err(Error::invalid_request("subtotal must not be negative"));
    }
    let quote = state
        .checkout
        .quote_promo(&body.code, body.subtotal_cents)
        .await?;
    Ok(HttpResponse::Ok().json(ValidatePromoResponse {
        code: quote.code,
        discount_cents: quote.discount_cents,
        total_cents: quote.total_cents,
    }))
}

/// OpenAPI shape of the checkout request body.
#[derive(ToSchema)]
#[schema(as = CheckoutRequest)]
#[expect(dead_code, reason = "schema-only mirror of the domain input type")]
pub struct CheckoutRequestSchema {
    #[schema(example = "Ada Lovelace")]
    customer_name: String,
    #[schema(example = "ada@example.com")]
    customer_email: String,
    customer_phone: Option<String>,
    shipping_address: String,
    note: Option<String>,
    #[schema(value_type = Vec<serde_json::Value>)]
    lines: Vec<serde_json::Value>,
    promo_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::json;

    use crate::inbound::http::test_utils::fixture_state;

    async fn post(uri: &str, body: serde_json::Value) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(fixture_state()))
                .service(post_checkout)
                .service(validate_promo_code),
        )
        .await;
        test::call_service(
            &app,
            test::TestRequest::post().uri(uri).set_json(body).to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn empty_cart_is_a_bad_request() {
        let res = post(
            "/checkout",
            json!({
                "customerName": "Ada",
                "customerEmail": "ada@example.com",
                "shippingAddress": "1 Loom Lane",
                "lines": []
            }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unknown_product_is_not_found() {
        let res = post(
            "/checkout",
            json!({
                "customerName": "Ada",
                "customerEmail": "ada@example.com",
                "shippingAddress": "1 Loom Lane",
                "lines": [{"productId": Uuid::new_v4(), "quantity": 1}]
            }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unknown_promo_code_is_a_bad_request() {
        let res = post(
            "/promo-codes/validate",
            json!({"code": "NOPE", "subtotalCents": 10_000}),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn negative_subtotal_is_rejected() {
        let res = post(
            "/promo-codes/validate",
            json!({"code": "NOPE", "subtotalCents": -1}),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
