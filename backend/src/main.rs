//! Backend entry-point: reads the environment and starts the HTTP server.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use reqwest::Url;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use fernloom::domain::ports::{AdminAuthService, AdminCredentials};
use fernloom::outbound::persistence::{DbPool, PoolConfig};
use fernloom::server::{MailSettings, PaymentSettings, ServerConfig, create_server};

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn load_admin() -> AdminAuthService {
    let credentials = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
        (Ok(username), Ok(password)) => AdminCredentials::try_from_parts(&username, &password),
        _ => None,
    };
    if credentials.is_none() {
        warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set; back-office login is disabled");
    }
    AdminAuthService::new(credentials)
}

fn parse_endpoint(var: &str) -> std::io::Result<Option<Url>> {
    match env::var(var) {
        Ok(raw) => {
            let url = Url::parse(&raw)
                .map_err(|e| std::io::Error::other(format!("invalid {var}: {e}")))?;
            Ok(Some(url))
        }
        Err(_) => Ok(None),
    }
}

fn load_payment() -> std::io::Result<Option<PaymentSettings>> {
    let Some(endpoint) = parse_endpoint("PAYMENT_ENDPOINT")? else {
        return Ok(None);
    };
    let api_key = env::var("PAYMENT_API_KEY")
        .map_err(|_| std::io::Error::other("PAYMENT_ENDPOINT set but PAYMENT_API_KEY missing"))?;
    Ok(Some(PaymentSettings { endpoint, api_key }))
}

fn load_mail() -> std::io::Result<Option<MailSettings>> {
    let Some(endpoint) = parse_endpoint("MAIL_ENDPOINT")? else {
        return Ok(None);
    };
    let api_key = env::var("MAIL_API_KEY")
        .map_err(|_| std::io::Error::other("MAIL_ENDPOINT set but MAIL_API_KEY missing"))?;
    let sender_address = env::var("MAIL_SENDER")
        .map_err(|_| std::io::Error::other("MAIL_ENDPOINT set but MAIL_SENDER missing"))?;
    Ok(Some(MailSettings {
        endpoint,
        api_key,
        sender_address,
        admin_email: env::var("ADMIN_EMAIL").ok(),
    }))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr, load_admin());

    if let Ok(database_url) = env::var("DATABASE_URL") {
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
        config = config.with_db_pool(pool);
    } else {
        warn!("DATABASE_URL not set; the server will serve fixture data");
    }
    if let Some(payment) = load_payment()? {
        config = config.with_payment(payment);
    }
    if let Some(mail) = load_mail()? {
        config = config.with_mail(mail);
    }

    create_server(config)?.await
}
