//! Bulk CSV product import endpoint.
//!
//! ```text
//! POST /api/v1/admin/products/import
//! ```
//!
//! Accepts a multipart upload with one CSV file field named `file`. The
//! response always carries the full per-row report; only a missing file,
//! unparseable CSV, or unreachable reference data fails the request.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, post, web};
use futures_util::StreamExt as _;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Uploads beyond this size are rejected before parsing.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Pull the bytes of the `file` field out of the multipart stream.
async fn read_csv_field(mut payload: Multipart) -> Result<Vec<u8>, Error> {
    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|err| Error::invalid_request(format!("malformed upload: {err}")))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_owned();
        if name != "file" {
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|err| Error::invalid_request(format!("upload aborted: {err}")))?;
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(Error::invalid_request("upload exceeds the size limit"));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(bytes);
    }
    Err(Error::invalid_request("missing file field 'file'"))
}

/// Import products from an uploaded CSV file.
#[utoipa::path(
    post,
    path = "/api/v1/admin/products/import",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Per-row import report", body = crate::domain::import::ImportReport),
        (status = 400, description = "Missing file or unparseable CSV", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 503, description = "Reference data unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminImportProducts",
    security(("SessionCookie" = []))
)]
#[post("/products/import")]
pub async fn admin_import_products(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let bytes = read_csv_field(payload).await?;
    let report = state.import.run(&bytes).await?;
    Ok(HttpResponse::Ok().json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};

    use crate::inbound::http::test_utils::{fixture_state, test_session_middleware};

    fn multipart_body(field_name: &str, csv: &str) -> (&'static str, Vec<u8>) {
        let boundary = "----fernloom-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"{field_name}\"; filename=\"products.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {csv}\r\n\
             --{boundary}--\r\n"
        );
        (
            "multipart/form-data; boundary=----fernloom-test-boundary",
            body.into_bytes(),
        )
    }

    async fn upload(field_name: &str, csv: &str) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(fixture_state()))
                .service(crate::inbound::http::admin_auth::admin_login)
                .service(admin_import_products),
        )
        .await;

        let login = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_json(serde_json::json!({"username": "admin", "password": "s3cret"}))
                .to_request(),
        )
        .await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let (content_type, body) = multipart_body(field_name, csv);
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/products/import")
                .cookie(cookie)
                .insert_header(("content-type", content_type))
                .set_payload(body)
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn upload_without_session_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(fixture_state()))
                .service(admin_import_products),
        )
        .await;
        let (content_type, body) = multipart_body("file", "name\n");
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/products/import")
                .insert_header(("content-type", content_type))
                .set_payload(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn wrong_field_name_is_a_bad_request() {
        let res = upload("attachment", "name,product_type,prices\n").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn row_failures_come_back_in_the_report() {
        // Fixture writer rejects every row, so a valid CSV row surfaces as a
        // database row error rather than failing the request.
        let csv = "name,product_type,sizes,prices\nRug,carpet,160,1500";
        let res = upload("file", csv).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["successCount"], 0);
        assert_eq!(body["errorCount"], 1);
        assert_eq!(body["errors"][0]["field"], "database");
    }

    #[actix_web::test]
    async fn unparseable_csv_is_a_bad_request() {
        let res = upload("file", "name,prices\n\"Rug,10").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
