//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers deal only with domain-friendly
//! operations: persisting the admin id at login, requiring it on protected
//! routes, and clearing it at logout.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::Error;

pub(crate) const ADMIN_ID_KEY: &str = "admin_id";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated admin's id in the session cookie.
    pub fn persist_admin(&self, admin_id: Uuid) -> Result<(), Error> {
        self.0
            .insert(ADMIN_ID_KEY, admin_id)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the admin id from the session, if present.
    pub fn admin_id(&self) -> Result<Option<Uuid>, Error> {
        self.0
            .get::<Uuid>(ADMIN_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Require an authenticated admin or return `401 Unauthorized`.
    pub fn require_admin(&self) -> Result<Uuid, Error> {
        self.admin_id()?
            .ok_or_else(|| Error::unauthorized("admin login required"))
    }

    /// Drop the session entirely.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use crate::inbound::http::test_utils::test_session_middleware;

    #[actix_web::test]
    async fn round_trips_admin_id() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/login",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_admin(Uuid::nil())?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/guarded",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.require_admin()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                    }),
                ),
        )
        .await;

        let login =
            test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        assert_eq!(login.status(), StatusCode::OK);
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let guarded = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/guarded")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(guarded.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn missing_session_is_unauthorized() {
        let app = test::init_service(App::new().wrap(test_session_middleware()).route(
            "/guarded",
            web::get().to(|session: SessionContext| async move {
                session.require_admin()?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/guarded").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
