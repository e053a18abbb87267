//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting handlers turn
//! domain failures into consistent JSON responses and status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::ports::{
    AttributeRepositoryError, ContentRepositoryError, ProductRepositoryError,
    PromoCodeRepositoryError,
};
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<ProductRepositoryError> for Error {
    fn from(err: ProductRepositoryError) -> Self {
        match err {
            ProductRepositoryError::NotFound { .. } => Error::not_found(err.to_string()),
            ProductRepositoryError::DuplicateSlug { .. } => Error::conflict(err.to_string()),
            ProductRepositoryError::Connection { .. } => {
                Error::service_unavailable(err.to_string())
            }
            ProductRepositoryError::Query { .. } => Error::internal(err.to_string()),
        }
    }
}

impl From<AttributeRepositoryError> for Error {
    fn from(err: AttributeRepositoryError) -> Self {
        match err {
            AttributeRepositoryError::NotFound { .. } => Error::not_found(err.to_string()),
            AttributeRepositoryError::DuplicateSlug { .. } => Error::conflict(err.to_string()),
            AttributeRepositoryError::Connection { .. } => {
                Error::service_unavailable(err.to_string())
            }
            AttributeRepositoryError::Query { .. } => Error::internal(err.to_string()),
        }
    }
}

impl From<PromoCodeRepositoryError> for Error {
    fn from(err: PromoCodeRepositoryError) -> Self {
        match err {
            PromoCodeRepositoryError::NotFound { .. } => Error::not_found(err.to_string()),
            PromoCodeRepositoryError::DuplicateCode { .. } => Error::conflict(err.to_string()),
            PromoCodeRepositoryError::Connection { .. } => {
                Error::service_unavailable(err.to_string())
            }
            PromoCodeRepositoryError::Query { .. } => Error::internal(err.to_string()),
        }
    }
}

impl From<ContentRepositoryError> for Error {
    fn from(err: ContentRepositoryError) -> Self {
        match err {
            ContentRepositoryError::NotFound { .. } => Error::not_found(err.to_string()),
            ContentRepositoryError::Connection { .. } => {
                Error::service_unavailable(err.to_string())
            }
            ContentRepositoryError::Query { .. } => Error::internal(err.to_string()),
        }
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("login"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("no"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("gone"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("taken"), StatusCode::CONFLICT)]
    #[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[actix_web::test]
    async fn internal_messages_are_redacted() {
        let response = Error::internal("secret database detail").error_response();
        let body = to_bytes(response.into_body()).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["message"], "Internal server error");
        assert_eq!(payload["code"], "internal_error");
    }

    #[actix_web::test]
    async fn client_errors_keep_their_message() {
        let response = Error::invalid_request("prices is required").error_response();
        let body = to_bytes(response.into_body()).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["message"], "prices is required");
    }
}
