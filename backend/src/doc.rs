//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every HTTP endpoint and request/response schema
//! into one document. Swagger UI serves it at `/docs` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::import::{ImportReport, RowError};
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::admin_attributes::AttributeUpsertRequest;
use crate::inbound::http::admin_auth::LoginRequest;
use crate::inbound::http::admin_content::{BannerUpsertRequest, GalleryImageUpsertRequest};
use crate::inbound::http::admin_products::{
    AttributeSetRequest, ProductUpsertRequest, StockUpdateRequest, VariantCreateRequest,
};
use crate::inbound::http::admin_promo_codes::PromoCodeUpsertRequest;
use crate::inbound::http::catalog::{
    AttributeResponse, ProductDetailResponse, ProductSummary, VariantResponse,
};
use crate::inbound::http::checkout::{
    CheckoutRequestSchema, CheckoutResponse, ValidatePromoRequest, ValidatePromoResponse,
};
use crate::inbound::http::health::HealthResponse;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/admin/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Fernloom backend API",
        description = "Storefront catalogue, checkout, and the session-authenticated back office.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::get_health,
        crate::inbound::http::catalog::list_products,
        crate::inbound::http::catalog::get_product,
        crate::inbound::http::catalog::get_banner,
        crate::inbound::http::catalog::get_gallery,
        crate::inbound::http::checkout::post_checkout,
        crate::inbound::http::checkout::validate_promo_code,
        crate::inbound::http::admin_auth::admin_login,
        crate::inbound::http::admin_auth::admin_logout,
        crate::inbound::http::admin_import::admin_import_products,
        crate::inbound::http::admin_products::admin_list_products,
        crate::inbound::http::admin_products::admin_create_product,
        crate::inbound::http::admin_products::admin_update_product,
        crate::inbound::http::admin_products::admin_delete_product,
        crate::inbound::http::admin_products::admin_set_product_attributes,
        crate::inbound::http::admin_products::admin_create_variant,
        crate::inbound::http::admin_products::admin_update_variant_stock,
        crate::inbound::http::admin_products::admin_delete_variant,
        crate::inbound::http::admin_attributes::admin_list_attributes,
        crate::inbound::http::admin_attributes::admin_create_attribute,
        crate::inbound::http::admin_attributes::admin_update_attribute,
        crate::inbound::http::admin_attributes::admin_delete_attribute,
        crate::inbound::http::admin_promo_codes::admin_list_promo_codes,
        crate::inbound::http::admin_promo_codes::admin_create_promo_code,
        crate::inbound::http::admin_promo_codes::admin_update_promo_code,
        crate::inbound::http::admin_promo_codes::admin_delete_promo_code,
        crate::inbound::http::admin_content::admin_set_banner,
        crate::inbound::http::admin_content::admin_list_gallery,
        crate::inbound::http::admin_content::admin_add_gallery_image,
        crate::inbound::http::admin_content::admin_update_gallery_image,
        crate::inbound::http::admin_content::admin_delete_gallery_image,
    ),
    components(schemas(
        Error,
        ErrorCode,
        HealthResponse,
        ProductSummary,
        VariantResponse,
        AttributeResponse,
        ProductDetailResponse,
        CheckoutRequestSchema,
        CheckoutResponse,
        ValidatePromoRequest,
        ValidatePromoResponse,
        LoginRequest,
        ImportReport,
        RowError,
        ProductUpsertRequest,
        VariantCreateRequest,
        StockUpdateRequest,
        AttributeSetRequest,
        AttributeUpsertRequest,
        PromoCodeUpsertRequest,
        BannerUpsertRequest,
        GalleryImageUpsertRequest,
    )),
    tags(
        (name = "catalog", description = "Public product browsing"),
        (name = "content", description = "Public banner and gallery content"),
        (name = "checkout", description = "Cart pricing and order placement"),
        (name = "admin", description = "Session-authenticated back office"),
        (name = "health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_lists_storefront_and_admin_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/v1/products"));
        assert!(paths.contains_key("/api/v1/checkout"));
        assert!(paths.contains_key("/api/v1/admin/products/import"));
        assert!(paths.contains_key("/health"));
    }

    #[test]
    fn import_report_schema_carries_row_errors() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let report = schemas.get("ImportReport").expect("ImportReport schema");

        assert_object_schema_has_field(report, "successCount");
        assert_object_schema_has_field(report, "errors");
    }
}
