//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use reqwest::Url;

use crate::domain::ports::AdminAuthService;
use crate::outbound::persistence::DbPool;

/// Connection settings for the hosted-payment provider.
#[derive(Clone)]
pub struct PaymentSettings {
    pub endpoint: Url,
    pub api_key: String,
}

/// Connection settings for the transactional mail provider.
#[derive(Clone)]
pub struct MailSettings {
    pub endpoint: Url,
    pub api_key: String,
    /// Address transactional mail is sent from.
    pub sender_address: String,
    /// Back-office address receiving new-order notifications, if any.
    pub admin_email: Option<String>,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) admin: AdminAuthService,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) payment: Option<PaymentSettings>,
    pub(crate) mail: Option<MailSettings>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        admin: AdminAuthService,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            admin,
            db_pool: None,
            payment: None,
            mail: None,
        }
    }

    /// Attach a database connection pool for persistence adapters. Without
    /// one the server runs on fixtures, which is only useful in tests.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach payment provider settings.
    #[must_use]
    pub fn with_payment(mut self, payment: PaymentSettings) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Attach mail provider settings.
    #[must_use]
    pub fn with_mail(mut self, mail: MailSettings) -> Self {
        self.mail = Some(mail);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
