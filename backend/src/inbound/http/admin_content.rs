//! Admin management of the banner and the gallery.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::catalog::{BannerDraft, GalleryImageDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body replacing the landing banner.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BannerUpsertRequest {
    pub headline: String,
    pub subtext: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Request body for gallery image create and update.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageUpsertRequest {
    pub url: String,
    pub caption: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl BannerUpsertRequest {
    fn into_draft(self) -> Result<BannerDraft, Error> {
        if self.headline.trim().is_empty() {
            return Err(Error::invalid_request("headline must not be empty"));
        }
        Ok(BannerDraft {
            headline: self.headline,
            subtext: self.subtext,
            image_url: self.image_url,
            link_url: self.link_url,
            is_active: self.is_active,
        })
    }
}

impl GalleryImageUpsertRequest {
    fn into_draft(self) -> Result<GalleryImageDraft, Error> {
        if self.url.trim().is_empty() {
            return Err(Error::invalid_request("url must not be empty"));
        }
        Ok(GalleryImageDraft {
            url: self.url,
            caption: self.caption,
            sort_order: self.sort_order,
            is_active: self.is_active,
        })
    }
}

/// Replace the landing banner.
#[utoipa::path(
    put,
    path = "/api/v1/admin/content/banner",
    request_body = BannerUpsertRequest,
    responses(
        (status = 200, description = "Banner replaced"),
        (status = 401, description = "Not logged in", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSetBanner",
    security(("SessionCookie" = []))
)]
#[put("/content/banner")]
pub async fn admin_set_banner(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<BannerUpsertRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let draft = body.into_inner().into_draft()?;
    let banner = state.content.set_banner(&draft).await?;
    Ok(HttpResponse::Ok().json(banner))
}

/// List every gallery image, inactive included.
#[utoipa::path(
    get,
    path = "/api/v1/admin/content/gallery",
    responses(
        (status = 200, description = "All gallery images"),
        (status = 401, description = "Not logged in", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListGallery",
    security(("SessionCookie" = []))
)]
#[get("/content/gallery")]
pub async fn admin_list_gallery(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let images = state.content.gallery(false).await?;
    Ok(HttpResponse::Ok().json(images))
}

/// Add a gallery image.
#[utoipa::path(
    post,
    path = "/api/v1/admin/content/gallery",
    request_body = GalleryImageUpsertRequest,
    responses((status = 201, description = "Gallery image added")),
    tags = ["admin"],
    operation_id = "adminAddGalleryImage",
    security(("SessionCookie" = []))
)]
#[post("/content/gallery")]
pub async fn admin_add_gallery_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<GalleryImageUpsertRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let draft = body.into_inner().into_draft()?;
    let image = state.content.add_gallery_image(&draft).await?;
    Ok(HttpResponse::Created().json(image))
}

/// Update a gallery image.
#[utoipa::path(
    put,
    path = "/api/v1/admin/content/gallery/{id}",
    params(("id" = Uuid, Path, description = "Gallery image id")),
    request_body = GalleryImageUpsertRequest,
    responses(
        (status = 200, description = "Gallery image updated"),
        (status = 404, description = "Unknown gallery image", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateGalleryImage",
    security(("SessionCookie" = []))
)]
#[put("/content/gallery/{id}")]
pub async fn admin_update_gallery_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: web::Json<GalleryImageUpsertRequest>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let draft = body.into_inner().into_draft()?;
    let image = state.content.update_gallery_image(*id, &draft).await?;
    Ok(HttpResponse::Ok().json(image))
}

/// Delete a gallery image.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/content/gallery/{id}",
    params(("id" = Uuid, Path, description = "Gallery image id")),
    responses(
        (status = 204, description = "Gallery image deleted"),
        (status = 404, description = "Unknown gallery image", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteGalleryImage",
    security(("SessionCookie" = []))
)]
#[delete("/content/gallery/{id}")]
pub async fn admin_delete_gallery_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    state.content.delete_gallery_image(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}
