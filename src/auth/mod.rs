//! Admin credential check.
//!
//! Routes depend on [`Authenticator`] only, so the static email/password pair can be
//! swapped for a real scheme without touching route logic.

use serde::Deserialize;

use crate::config::Config;

/// Login attempt submitted by the admin console.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub trait Authenticator: Send + Sync {
    /// Whether the credentials grant admin access.
    fn verify(&self, credentials: &Credentials) -> bool;
}

/// Compares against a single email/password pair held in configuration.
///
/// Not a security boundary. With no pair configured every attempt is rejected.
#[derive(Clone, Default)]
pub struct StaticCredentials {
    email: Option<String>,
    password: Option<String>,
}

impl StaticCredentials {
    #[must_use]
    pub const fn new(email: Option<String>, password: Option<String>) -> Self {
        Self { email, password }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let credentials = Self::new(config.admin_email.clone(), config.admin_password.clone());
        if !credentials.is_configured() {
            tracing::warn!("ADMIN_EMAIL / ADMIN_PASSWORD not set, admin login is disabled");
        }
        credentials
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }
}

impl Authenticator for StaticCredentials {
    fn verify(&self, credentials: &Credentials) -> bool {
        let (Some(email), Some(password)) = (&self.email, &self.password) else {
            return false;
        };

        credentials.email.trim().eq_ignore_ascii_case(email.trim())
            && credentials.password == *password
    }
}
