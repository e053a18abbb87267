//! Admin product and variant management.
//!
//! ```text
//! GET    /api/v1/admin/products
//! POST   /api/v1/admin/products
//! PUT    /api/v1/admin/products/{id}
//! DELETE /api/v1/admin/products/{id}
//! PUT    /api/v1/admin/products/{id}/attributes/{kind}
//! POST   /api/v1/admin/products/{id}/variants
//! PUT    /api/v1/admin/variants/{id}/stock
//! DELETE /api/v1/admin/variants/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::catalog::{AttributeKind, ProductDraft, ProductKind, VariantDraft};
use crate::domain::ports::ProductFilter;
use crate::domain::slug::slugify;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for creating or updating a product.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpsertRequest {
    /// Defaults to a slugified `name` when omitted.
    pub slug: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = "carpet")]
    pub kind: String,
    pub material: Option<String>,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl ProductUpsertRequest {
    fn into_draft(self) -> Result<ProductDraft, Error> {
        let kind = ProductKind::from_token(&self.kind)
            .ok_or_else(|| Error::invalid_request(format!("unknown kind '{}'", self.kind)))?;
        let draft = ProductDraft {
            slug: self.slug.unwrap_or_else(|| slugify(&self.name)),
            name: self.name,
            description: self.description,
            kind,
            material: self.material,
            price_cents: self.price_cents,
            compare_at_price_cents: self.compare_at_price_cents,
            stock_quantity: self.stock_quantity,
            is_featured: self.is_featured,
            is_active: self.is_active,
        };
        draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(draft)
    }
}

/// Request body for creating a variant.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantCreateRequest {
    pub sku: String,
    #[schema(example = "160×230")]
    pub size_label: String,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    #[serde(default)]
    pub stock_quantity: i32,
    pub color_id: Option<Uuid>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl VariantCreateRequest {
    fn into_draft(self) -> Result<VariantDraft, Error> {
        let draft = VariantDraft {
            sku: self.sku,
            size_label: self.size_label,
            price_cents: self.price_cents,
            compare_at_price_cents: self.compare_at_price_cents,
            stock_quantity: self.stock_quantity,
            color_id: self.color_id,
            is_active: self.is_active,
            sort_order: self.sort_order,
        };
        draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(draft)
    }
}

/// Request body for the inventory editor.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdateRequest {
    pub stock_quantity: i32,
}

/// Request body replacing a product's attribute set for one kind.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSetRequest {
    pub attribute_ids: Vec<Uuid>,
}

fn parse_kind(token: &str) -> Result<AttributeKind, Error> {
    AttributeKind::from_token(token)
        .ok_or_else(|| Error::invalid_request(format!("unknown attribute kind '{token}'")))
}

/// List every product, inactive included.
#[utoipa::path(
    get,
    path = "/api/v1/admin/products",
    responses(
        (status = 200, description = "All products"),
        (status = 401, description = "Not logged in", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListProducts",
    security(("SessionCookie" = []))
)]
#[get("/products")]
pub async fn admin_list_products(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let filter = ProductFilter {
        include_inactive: true,
        limit: 500,
        ..ProductFilter::default()
    };
    let products = state.catalog.list(&filter).await?;
    Ok(HttpResponse::Ok().json(products))
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/api/v1/admin/products",
    request_body = ProductUpsertRequest,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Invalid draft", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 409, description = "Slug already in use", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminCreateProduct",
    security(("SessionCookie" = []))
)]
#[post("/products")]
pub async fn admin_create_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<ProductUpsertRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let draft = body.into_inner().into_draft()?;
    let product = state.products.create(&draft).await?;
    Ok(HttpResponse::Created().json(product))
}

/// Update a product.
#[utoipa::path(
    put,
    path = "/api/v1/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ProductUpsertRequest,
    responses(
        (status = 200, description = "Product updated"),
        (status = 404, description = "Unknown product", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateProduct",
    security(("SessionCookie" = []))
)]
#[put("/products/{id}")]
pub async fn admin_update_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: web::Json<ProductUpsertRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let draft = body.into_inner().into_draft()?;
    let product = state.products.update(*id, &draft).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Delete a product and everything hanging off it.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Unknown product", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteProduct",
    security(("SessionCookie" = []))
)]
#[delete("/products/{id}")]
pub async fn admin_delete_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    state.products.delete(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Replace a product's associations for one attribute kind.
#[utoipa::path(
    put,
    path = "/api/v1/admin/products/{id}/attributes/{kind}",
    params(
        ("id" = Uuid, Path, description = "Product id"),
        ("kind" = String, Path, description = "Attribute kind token")
    ),
    request_body = AttributeSetRequest,
    responses(
        (status = 204, description = "Associations replaced"),
        (status = 400, description = "Unknown attribute kind", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSetProductAttributes",
    security(("SessionCookie" = []))
)]
#[put("/products/{id}/attributes/{kind}")]
pub async fn admin_set_product_attributes(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(Uuid, String)>,
    body: web::Json<AttributeSetRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let (product_id, kind_token) = path.into_inner();
    let kind = parse_kind(&kind_token)?;
    state
        .products
        .set_attributes(product_id, kind, &body.attribute_ids)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a variant to a product.
#[utoipa::path(
    post,
    path = "/api/v1/admin/products/{id}/variants",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = VariantCreateRequest,
    responses(
        (status = 201, description = "Variant created"),
        (status = 404, description = "Unknown product", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminCreateVariant",
    security(("SessionCookie" = []))
)]
#[post("/products/{id}/variants")]
pub async fn admin_create_variant(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: web::Json<VariantCreateRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let draft = body.into_inner().into_draft()?;
    let variant = state.products.create_variant(*id, &draft).await?;
    Ok(HttpResponse::Created().json(variant))
}

/// Set the stock quantity for one variant.
#[utoipa::path(
    put,
    path = "/api/v1/admin/variants/{id}/stock",
    params(("id" = Uuid, Path, description = "Variant id")),
    request_body = StockUpdateRequest,
    responses(
        (status = 204, description = "Stock updated"),
        (status = 400, description = "Negative stock", body = Error),
        (status = 404, description = "Unknown variant", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateVariantStock",
    security(("SessionCookie" = []))
)]
#[put("/variants/{id}/stock")]
pub async fn admin_update_variant_stock(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: web::Json<StockUpdateRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    if body.stock_quantity < 0 {
        return Err(Error::invalid_request("stock must not be negative"));
    }
    state
        .products
        .update_variant_stock(*id, body.stock_quantity)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a variant.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/variants/{id}",
    params(("id" = Uuid, Path, description = "Variant id")),
    responses(
        (status = 204, description = "Variant deleted"),
        (status = 404, description = "Unknown variant", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteVariant",
    security(("SessionCookie" = []))
)]
#[delete("/variants/{id}")]
pub async fn admin_delete_variant(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    state.products.delete_variant(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request() -> ProductUpsertRequest {
        ProductUpsertRequest {
            slug: None,
            name: "Persian Garden Rug".into(),
            description: String::new(),
            kind: "carpet".into(),
            material: None,
            price_cents: 150_000,
            compare_at_price_cents: None,
            stock_quantity: 0,
            is_featured: false,
            is_active: true,
        }
    }

    #[test]
    fn missing_slug_is_derived_from_the_name() {
        let draft = request().into_draft().expect("draft");
        assert_eq!(draft.slug, "persian-garden-rug");
    }

    #[test]
    fn explicit_slug_is_kept() {
        let mut req = request();
        req.slug = Some("pgr-special".into());
        assert_eq!(req.into_draft().expect("draft").slug, "pgr-special");
    }

    #[rstest]
    #[case("furniture")]
    #[case("Carpet")]
    fn unknown_kind_is_rejected(#[case] kind: &str) {
        let mut req = request();
        req.kind = kind.into();
        assert!(req.into_draft().is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut req = request();
        req.price_cents = -1;
        assert!(req.into_draft().is_err());
    }
}
