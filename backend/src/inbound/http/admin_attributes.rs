//! Admin CRUD for the nine attribute reference tables.
//!
//! One set of handlers serves every kind; the kind arrives as a path
//! segment (`/admin/attributes/{kind}`), e.g. `category` or `plant_light`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::catalog::{AttributeDraft, AttributeKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for creating or updating an attribute.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeUpsertRequest {
    #[schema(example = "living-room")]
    pub slug: String,
    #[schema(example = "Living Room")]
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_true() -> bool {
    true
}

impl AttributeUpsertRequest {
    fn into_draft(self) -> Result<AttributeDraft, Error> {
        let draft = AttributeDraft {
            slug: self.slug,
            name: self.name,
            is_active: self.is_active,
            sort_order: self.sort_order,
        };
        draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(draft)
    }
}

fn parse_kind(token: &str) -> Result<AttributeKind, Error> {
    AttributeKind::from_token(token)
        .ok_or_else(|| Error::invalid_request(format!("unknown attribute kind '{token}'")))
}

/// List attributes of one kind.
#[utoipa::path(
    get,
    path = "/api/v1/admin/attributes/{kind}",
    params(("kind" = String, Path, description = "Attribute kind token")),
    responses(
        (status = 200, description = "Attributes of the kind"),
        (status = 400, description = "Unknown kind", body = Error),
        (status = 401, description = "Not logged in", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListAttributes",
    security(("SessionCookie" = []))
)]
#[get("/attributes/{kind}")]
pub async fn admin_list_attributes(
    state: web::Data<HttpState>,
    session: SessionContext,
    kind: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let kind = parse_kind(&kind)?;
    let attributes = state.attributes.list(kind).await?;
    Ok(HttpResponse::Ok().json(attributes))
}

/// Create an attribute.
#[utoipa::path(
    post,
    path = "/api/v1/admin/attributes/{kind}",
    params(("kind" = String, Path, description = "Attribute kind token")),
    request_body = AttributeUpsertRequest,
    responses(
        (status = 201, description = "Attribute created"),
        (status = 409, description = "Slug already in use", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminCreateAttribute",
    security(("SessionCookie" = []))
)]
#[post("/attributes/{kind}")]
pub async fn admin_create_attribute(
    state: web::Data<HttpState>,
    session: SessionContext,
    kind: web::Path<String>,
    body: web::Json<AttributeUpsertRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let kind = parse_kind(&kind)?;
    let draft = body.into_inner().into_draft()?;
    let attribute = state.attributes.create(kind, &draft).await?;
    Ok(HttpResponse::Created().json(attribute))
}

/// Update an attribute.
#[utoipa::path(
    put,
    path = "/api/v1/admin/attributes/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "Attribute kind token"),
        ("id" = Uuid, Path, description = "Attribute id")
    ),
    request_body = AttributeUpsertRequest,
    responses(
        (status = 200, description = "Attribute updated"),
        (status = 404, description = "Unknown attribute", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateAttribute",
    security(("SessionCookie" = []))
)]
#[put("/attributes/{kind}/{id}")]
pub async fn admin_update_attribute(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, Uuid)>,
    body: web::Json<AttributeUpsertRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let (kind_token, id) = path.into_inner();
    let kind = parse_kind(&kind_token)?;
    let draft = body.into_inner().into_draft()?;
    let attribute = state.attributes.update(kind, id, &draft).await?;
    Ok(HttpResponse::Ok().json(attribute))
}

/// Delete an attribute and its product associations.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/attributes/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "Attribute kind token"),
        ("id" = Uuid, Path, description = "Attribute id")
    ),
    responses(
        (status = 204, description = "Attribute deleted"),
        (status = 404, description = "Unknown attribute", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteAttribute",
    security(("SessionCookie" = []))
)]
#[delete("/attributes/{kind}/{id}")]
pub async fn admin_delete_attribute(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, Uuid)>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let (kind_token, id) = path.into_inner();
    let kind = parse_kind(&kind_token)?;
    state.attributes.delete(kind, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("category")]
    #[case("plant_pet_safety")]
    fn every_kind_token_parses(#[case] token: &str) {
        assert!(parse_kind(token).is_ok());
    }

    #[test]
    fn unknown_kind_token_is_rejected() {
        assert!(parse_kind("flavor").is_err());
    }

    #[test]
    fn draft_validation_runs_before_persistence() {
        let req = AttributeUpsertRequest {
            slug: "Not A Slug".into(),
            name: "Name".into(),
            is_active: true,
            sort_order: 0,
        };
        assert!(req.into_draft().is_err());
    }
}
