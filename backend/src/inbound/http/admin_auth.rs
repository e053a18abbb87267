//! Admin login and logout.
//!
//! ```text
//! POST /api/v1/admin/login
//! POST /api/v1/admin/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::AdminAuthError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    pub password: String,
}

/// Authenticate the back-office account and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 204, description = "Session established"),
        (status = 401, description = "Bad credentials", body = Error),
        (status = 503, description = "No admin account configured", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminLogin"
)]
#[post("/login")]
pub async fn admin_login(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let admin_id = state
        .auth
        .authenticate(&body.username, &body.password)
        .map_err(|err| match err {
            AdminAuthError::BadCredentials => Error::unauthorized(err.to_string()),
            AdminAuthError::NotConfigured => Error::service_unavailable(err.to_string()),
        })?;
    session.persist_admin(admin_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Drop the admin session.
#[utoipa::path(
    post,
    path = "/api/v1/admin/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["admin"],
    operation_id = "adminLogout"
)]
#[post("/logout")]
pub async fn admin_logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
