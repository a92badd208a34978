use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,

    /// HS256 secret for magic-link tokens; rotating it invalidates all
    /// outstanding links
    pub token_secret: String,
    pub magic_link_ttl_minutes: i64,

    /// Public base URL of this API, used when building magic links
    pub base_url: String,

    /// Origins verification endpoints may redirect to
    pub allowed_redirect_origins: Vec<String>,
    /// Fallback target when a caller-supplied redirect is not allow-listed
    pub default_redirect: String,

    /// Pre-shared key admin frontends send in X-Admin-Key
    pub admin_api_key: String,

    // Profile image storage
    pub storage_root: PathBuf,
    pub storage_public_url: String,

    // Transactional email API (console backend when unset)
    pub email_api_endpoint: String,
    pub email_api_key: Option<String>,
    pub email_sender: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let default_redirect =
            env::var("DEFAULT_REDIRECT").unwrap_or_else(|_| "http://localhost:8501".to_string());

        let allowed_redirect_origins = env::var("ALLOWED_REDIRECT_ORIGINS")
            .unwrap_or_else(|_| default_redirect.clone())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            token_secret: env::var("TOKEN_SECRET").context("TOKEN_SECRET must be set")?,
            magic_link_ttl_minutes: env::var("MAGIC_LINK_TTL_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("MAGIC_LINK_TTL_MINUTES must be a valid number")?,
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            allowed_redirect_origins,
            default_redirect,
            admin_api_key: env::var("ADMIN_API_KEY").context("ADMIN_API_KEY must be set")?,
            storage_root: env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| "./storage".to_string())
                .into(),
            storage_public_url: env::var("STORAGE_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:8000/media".to_string()),
            email_api_endpoint: env::var("EMAIL_API_ENDPOINT")
                .unwrap_or_else(|_| "https://api.brevo.com/v3/smtp/email".to_string()),
            email_api_key: env::var("EMAIL_API_KEY").ok(),
            email_sender: env::var("EMAIL_SENDER").ok(),
        })
    }
}
