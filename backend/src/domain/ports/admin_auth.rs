//! Admin credential verification.
//!
//! A single back-office account is configured through the environment. The
//! service hands out an opaque session id on success; the HTTP layer stores
//! it in the session cookie.

use uuid::Uuid;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised during admin authentication.
    pub enum AdminAuthError {
        /// Username or password did not match.
        BadCredentials => "invalid username or password",
        /// No admin account is configured.
        NotConfigured => "admin authentication is not configured",
    }
}

/// The configured admin account.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminCredentials {
    /// Build credentials, rejecting blank parts.
    pub fn try_from_parts(username: &str, password: &str) -> Option<Self> {
        if username.trim().is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }
}

/// Verifies login attempts against the configured account.
#[derive(Debug, Clone)]
pub struct AdminAuthService {
    credentials: Option<AdminCredentials>,
    admin_id: Uuid,
}

impl AdminAuthService {
    pub fn new(credentials: Option<AdminCredentials>) -> Self {
        Self {
            credentials,
            admin_id: Uuid::new_v4(),
        }
    }

    /// Check a login attempt. Comparison touches both fields regardless of
    /// which one mismatches.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Uuid, AdminAuthError> {
        let Some(credentials) = &self.credentials else {
            return Err(AdminAuthError::not_configured());
        };
        let user_ok = credentials.username == username;
        let pass_ok = credentials.password == password;
        if user_ok && pass_ok {
            Ok(self.admin_id)
        } else {
            Err(AdminAuthError::bad_credentials())
        }
    }

    /// Whether a session id refers to the current admin account.
    pub fn is_current(&self, session_id: Uuid) -> bool {
        self.credentials.is_some() && session_id == self.admin_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AdminAuthService {
        AdminAuthService::new(AdminCredentials::try_from_parts("admin", "s3cret"))
    }

    #[test]
    fn valid_login_yields_stable_id() {
        let svc = service();
        let first = svc.authenticate("admin", "s3cret").unwrap();
        let second = svc.authenticate("admin", "s3cret").unwrap();
        assert_eq!(first, second);
        assert!(svc.is_current(first));
    }

    #[test]
    fn wrong_password_is_rejected() {
        assert_eq!(
            service().authenticate("admin", "nope"),
            Err(AdminAuthError::BadCredentials)
        );
    }

    #[test]
    fn unconfigured_service_rejects_everyone() {
        let svc = AdminAuthService::new(None);
        assert_eq!(
            svc.authenticate("admin", "s3cret"),
            Err(AdminAuthError::NotConfigured)
        );
        assert!(!svc.is_current(Uuid::new_v4()));
    }

    #[test]
    fn blank_credentials_are_not_accepted_at_build_time() {
        assert!(AdminCredentials::try_from_parts(" ", "pw").is_none());
        assert!(AdminCredentials::try_from_parts("admin", "").is_none());
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let creds = AdminCredentials::try_from_parts("admin", "s3cret").unwrap();
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("s3cret"));
    }
}
