//! Public storefront read endpoints.
//!
//! ```text
//! GET /api/v1/products
//! GET /api/v1/products/{slug}
//! GET /api/v1/content/banner
//! GET /api/v1/content/gallery
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::catalog::{AttributeKind, Product, ProductKind};
use crate::domain::ports::{ProductDetail, ProductFilter};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

const MAX_PAGE_SIZE: i64 = 100;

/// Listing filters accepted by `GET /products`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    /// `carpet` or `plant`.
    pub kind: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub shape: Option<String>,
    pub space: Option<String>,
    pub featured: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListProductsQuery {
    fn into_filter(self) -> Result<ProductFilter, Error> {
        let kind = match self.kind.as_deref() {
            None => None,
            Some(token) => Some(
                ProductKind::from_token(token)
                    .ok_or_else(|| Error::invalid_request(format!("unknown kind '{token}'")))?,
            ),
        };
        // At most one attribute filter applies at a time; first match wins.
        let attribute = [
            (AttributeKind::Category, &self.category),
            (AttributeKind::Color, &self.color),
            (AttributeKind::Shape, &self.shape),
            (AttributeKind::Space, &self.space),
        ]
        .into_iter()
        .find_map(|(kind, slug)| slug.as_ref().map(|slug| (kind, slug.clone())));

        let defaults = ProductFilter::default();
        Ok(ProductFilter {
            kind,
            attribute,
            featured_only: self.featured.unwrap_or(false),
            include_inactive: false,
            limit: self.limit.unwrap_or(defaults.limit).clamp(1, MAX_PAGE_SIZE),
            offset: self.offset.unwrap_or(0).max(0),
        })
    }
}

/// One product card in a listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    #[schema(value_type = String, example = "carpet")]
    pub kind: ProductKind,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub is_featured: bool,
    pub has_variants: bool,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            slug: product.slug,
            name: product.name,
            kind: product.kind,
            price_cents: product.price_cents,
            compare_at_price_cents: product.compare_at_price_cents,
            is_featured: product.is_featured,
            has_variants: product.has_variants,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantResponse {
    pub id: Uuid,
    pub sku: String,
    pub size_label: String,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub stock_quantity: i32,
    pub color_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeResponse {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

/// Full product detail for the storefront page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: ProductSummary,
    pub description: String,
    pub material: Option<String>,
    pub stock_quantity: i32,
    pub variants: Vec<VariantResponse>,
    pub image_urls: Vec<String>,
    /// Attribute values grouped by kind token.
    pub attributes: BTreeMap<String, Vec<AttributeResponse>>,
}

impl From<ProductDetail> for ProductDetailResponse {
    fn from(detail: ProductDetail) -> Self {
        let mut attributes: BTreeMap<String, Vec<AttributeResponse>> = BTreeMap::new();
        for attribute in detail.attributes {
            attributes
                .entry(attribute.kind.as_str().to_owned())
                .or_default()
                .push(AttributeResponse {
                    id: attribute.id,
                    slug: attribute.slug,
                    name: attribute.name,
                });
        }
        let description = detail.product.description.clone();
        let material = detail.product.material.clone();
        let stock_quantity = detail.product.stock_quantity;
        Self {
            product: detail.product.into(),
            description,
            material,
            stock_quantity,
            variants: detail
                .variants
                .into_iter()
                .filter(|variant| variant.is_active)
                .map(|variant| VariantResponse {
                    id: variant.id,
                    sku: variant.sku,
                    size_label: variant.size_label,
                    price_cents: variant.price_cents,
                    compare_at_price_cents: variant.compare_at_price_cents,
                    stock_quantity: variant.stock_quantity,
                    color_id: variant.color_id,
                })
                .collect(),
            image_urls: detail.images.into_iter().map(|image| image.url).collect(),
            attributes,
        }
    }
}

/// List active products for the storefront.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Product listing", body = [ProductSummary]),
        (status = 400, description = "Bad filter", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "listProducts"
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    query: web::Query<ListProductsQuery>,
) -> ApiResult<HttpResponse> {
    let filter = query.into_inner().into_filter()?;
    let products = state.catalog.list(&filter).await?;
    let summaries: Vec<ProductSummary> = products.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/// Fetch one product with variants, images, and attributes.
#[utoipa::path(
    get,
    path = "/api/v1/products/{slug}",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product detail", body = ProductDetailResponse),
        (status = 404, description = "Unknown or inactive product", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "getProduct"
)]
#[get("/products/{slug}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let detail = state
        .catalog
        .find_detail_by_slug(&slug)
        .await?
        .filter(|detail| detail.product.is_active)
        .ok_or_else(|| Error::not_found("product not found"))?;
    Ok(HttpResponse::Ok().json(ProductDetailResponse::from(detail)))
}

/// Fetch the landing banner.
#[utoipa::path(
    get,
    path = "/api/v1/content/banner",
    responses(
        (status = 200, description = "Current banner"),
        (status = 404, description = "No banner configured", body = Error)
    ),
    tags = ["content"],
    operation_id = "getBanner"
)]
#[get("/content/banner")]
pub async fn get_banner(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let banner = state
        .content
        .banner()
        .await?
        .filter(|banner| banner.is_active)
        .ok_or_else(|| Error::not_found("no banner configured"))?;
    Ok(HttpResponse::Ok().json(banner))
}

/// Fetch the active gallery images.
#[utoipa::path(
    get,
    path = "/api/v1/content/gallery",
    responses((status = 200, description = "Gallery images")),
    tags = ["content"],
    operation_id = "getGallery"
)]
#[get("/content/gallery")]
pub async fn get_gallery(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let images = state.content.gallery(true).await?;
    Ok(HttpResponse::Ok().json(images))
}
