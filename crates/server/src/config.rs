//! Server configuration read from environment variables at startup.
//!
//! Everything that can have a sensible default has one; the two values
//! that cannot (database URL, OIDC issuer) are required.

use std::env;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// SMTP settings for the fee-reminder side-channel. All four variables
/// must be present; otherwise reminders are disabled.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Env: `SMTP_HOST`
    pub host: String,
    /// Env: `SMTP_USERNAME`
    pub username: String,
    /// Env: `SMTP_PASSWORD`
    pub password: String,
    /// Sender mailbox, e.g. `"CodeHub ERP <noreply@example.com>"`.
    /// Env: `SMTP_FROM`
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to.
    /// Env: `HTTP_ADDR`, default `0.0.0.0:5000`.
    pub http_addr: SocketAddr,

    /// Connection string for the document store.
    /// Env: `DATABASE_URL` (required).
    pub database_url: String,

    /// Issuer URL of the OIDC provider that signs the dashboard's bearer
    /// tokens. Env: `OIDC_ISSUER_URL` (required).
    pub oidc_issuer_url: String,

    /// Origin of the browser dashboard, used for CORS. Absent means any
    /// origin is allowed (local development).
    /// Env: `FRONTEND_URL`
    pub frontend_url: Option<String>,

    /// Optional SMTP settings; see [`SmtpConfig`].
    pub smtp: Option<SmtpConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr = match env::var("HTTP_ADDR") {
            Ok(raw) => raw.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
                name: "HTTP_ADDR",
                value: raw.clone(),
            })?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 5000)),
        };

        Ok(Self {
            http_addr,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            oidc_issuer_url: env::var("OIDC_ISSUER_URL")
                .map_err(|_| ConfigError::Missing("OIDC_ISSUER_URL"))?,
            frontend_url: env::var("FRONTEND_URL").ok(),
            smtp: smtp_config(
                env::var("SMTP_HOST").ok(),
                env::var("SMTP_USERNAME").ok(),
                env::var("SMTP_PASSWORD").ok(),
                env::var("SMTP_FROM").ok(),
            ),
        })
    }
}

fn smtp_config(
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
    from: Option<String>,
) -> Option<SmtpConfig> {
    match (host, username, password, from) {
        (Some(host), Some(username), Some(password), Some(from)) => Some(SmtpConfig {
            host,
            username,
            password,
            from,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smtp_requires_all_four_settings() {
        assert!(
            smtp_config(
                Some("smtp.example.com".into()),
                Some("user".into()),
                Some("pass".into()),
                None,
            )
            .is_none()
        );
        assert!(
            smtp_config(
                Some("smtp.example.com".into()),
                Some("user".into()),
                Some("pass".into()),
                Some("noreply@example.com".into()),
            )
            .is_some()
        );
    }
}
