//! Configuration module for the site backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;

use crate::errors::AppError;

/// Values the hosting templates ship with before a real database is attached.
const PLACEHOLDER_DATABASE_URLS: &[&str] = &["your_neon_connection_string_here", "base"];

/// Development fallback for the signing secret.
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// Room for several base64-encoded photos in one project payload.
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Admin emails, positionally paired with `admin_passwords`
    pub admin_emails: Vec<String>,
    /// Admin passwords
    pub admin_passwords: Vec<String>,
    /// Secret used to sign bearer tokens
    pub jwt_secret: String,
    /// Database connection string; `None` when absent or a placeholder
    pub database_url: Option<String>,
    /// Owning client id every stored row is scoped to
    pub client_id: i64,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Deployment environment name
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // A blank variable counts as unset.
        let admin_emails = split_list(
            &lookup("ADMIN_EMAILS")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "admin@example.com".to_string()),
        );
        let admin_passwords = split_list(
            &lookup("ADMIN_PASSWORDS")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "changeme".to_string()),
        );

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        let database_url = lookup("DATABASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && !PLACEHOLDER_DATABASE_URLS.contains(&s.as_str()));

        let client_id: i64 = match lookup("SITE_CLIENT_ID") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::Configuration(format!("Invalid SITE_CLIENT_ID: {}", raw))
            })?,
            None => 1,
        };

        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let bind_addr: SocketAddr = raw_addr
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid BIND_ADDR: {}", raw_addr)))?;

        let max_body_bytes: usize = match lookup("MAX_BODY_BYTES") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::Configuration(format!("Invalid MAX_BODY_BYTES: {}", raw))
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let environment = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        Ok(Self {
            admin_emails,
            admin_passwords,
            jwt_secret,
            database_url,
            client_id,
            bind_addr,
            max_body_bytes,
            log_level,
            environment,
        })
    }

    /// Whether the service runs in production, where internal error detail stays hidden.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Whether the signing secret is still the development fallback.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}
