//! Admin CRUD for promo codes.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::catalog::DiscountType;
use crate::domain::ports::PromoCodeDraft;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for creating or updating a promo code.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeUpsertRequest {
    #[schema(example = "SPRING10")]
    pub code: String,
    #[schema(example = "percentage")]
    pub discount_type: String,
    pub discount_value: i64,
    pub min_purchase_cents: Option<i64>,
    pub max_uses: Option<i32>,
    pub per_customer_cap: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl PromoCodeUpsertRequest {
    fn into_draft(self) -> Result<PromoCodeDraft, Error> {
        let discount_type = DiscountType::from_token(&self.discount_type).ok_or_else(|| {
            Error::invalid_request(format!("unknown discount type '{}'", self.discount_type))
        })?;
        let code = self.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(Error::invalid_request("code must not be empty"));
        }
        if self.discount_value <= 0 {
            return Err(Error::invalid_request("discount value must be positive"));
        }
        if discount_type == DiscountType::Percentage && self.discount_value > 100 {
            return Err(Error::invalid_request(
                "percentage discount cannot exceed 100",
            ));
        }
        Ok(PromoCodeDraft {
            code,
            discount_type,
            discount_value: self.discount_value,
            min_purchase_cents: self.min_purchase_cents,
            max_uses: self.max_uses,
            per_customer_cap: self.per_customer_cap,
            is_active: self.is_active,
            expires_at: self.expires_at,
        })
    }
}

/// List every promo code.
#[utoipa::path(
    get,
    path = "/api/v1/admin/promo-codes",
    responses(
        (status = 200, description = "All promo codes"),
        (status = 401, description = "Not logged in", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListPromoCodes",
    security(("SessionCookie" = []))
)]
#[get("/promo-codes")]
pub async fn admin_list_promo_codes(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let codes = state.promo_codes.list().await?;
    Ok(HttpResponse::Ok().json(codes))
}

/// Create a promo code.
#[utoipa::path(
    post,
    path = "/api/v1/admin/promo-codes",
    request_body = PromoCodeUpsertRequest,
    responses(
        (status = 201, description = "Promo code created"),
        (status = 409, description = "Code already exists", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminCreatePromoCode",
    security(("SessionCookie" = []))
)]
#[post("/promo-codes")]
pub async fn admin_create_promo_code(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<PromoCodeUpsertRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let draft = body.into_inner().into_draft()?;
    let code = state.promo_codes.create(&draft).await?;
    Ok(HttpResponse::Created().json(code))
}

/// Update a promo code.
#[utoipa::path(
    put,
    path = "/api/v1/admin/promo-codes/{id}",
    params(("id" = Uuid, Path, description = "Promo code id")),
    request_body = PromoCodeUpsertRequest,
    responses(
        (status = 200, description = "Promo code updated"),
        (status = 404, description = "Unknown promo code", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdatePromoCode",
    security(("SessionCookie" = []))
)]
#[put("/promo-codes/{id}")]
pub async fn admin_update_promo_code(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: web::Json<PromoCodeUpsertRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let draft = body.into_inner().into_draft()?;
    let code = state.promo_codes.update(*id, &draft).await?;
    Ok(HttpResponse::Ok().json(code))
}

/// Delete a promo code.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/promo-codes/{id}",
    params(("id" = Uuid, Path, description = "Promo code id")),
    responses(
        (status = 204, description = "Promo code deleted"),
        (status = 404, description = "Unknown promo code", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeletePromoCode",
    security(("SessionCookie" = []))
)]
#[delete("/promo-codes/{id}")]
pub async fn admin_delete_promo_code(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    state.promo_codes.delete(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PromoCodeUpsertRequest {
        PromoCodeUpsertRequest {
            code: "spring10".into(),
            discount_type: "percentage".into(),
            discount_value: 10,
            min_purchase_cents: None,
            max_uses: None,
            per_customer_cap: None,
            is_active: true,
            expires_at: None,
        }
    }

    #[test]
    fn codes_are_stored_uppercase() {
        let draft = request().into_draft().expect("draft");
        assert_eq!(draft.code, "SPRING10");
    }

    #[test]
    fn percentage_above_one_hundred_is_rejected() {
        let mut req = request();
        req.discount_value = 150;
        assert!(req.into_draft().is_err());
    }

    #[test]
    fn zero_discount_is_rejected() {
        let mut req = request();
        req.discount_value = 0;
        assert!(req.into_draft().is_err());
    }

    #[test]
    fn unknown_discount_type_is_rejected() {
        let mut req = request();
        req.discount_type = "bogo".into();
        assert!(req.into_draft().is_err());
    }
}
