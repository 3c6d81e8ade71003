//! Configuration module for the guestbook backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default provider endpoint used to resolve visitor access tokens.
pub const DEFAULT_KAKAO_API_BASE: &str = "https://kapi.kakao.com";

/// Longest admin token lifetime accepted (30 days).
pub const MAX_ADMIN_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared administrator password (admin login is disabled when unset)
    pub admin_password: Option<String>,
    /// HMAC secret used to sign admin tokens
    pub jwt_secret: Option<String>,
    /// Lifetime of an issued admin token, in seconds
    pub admin_token_ttl_secs: i64,
    /// Path to the JSON document holding all guestbook data
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Public domain; restricts CORS to `https://<domain>` when present
    pub domain: Option<String>,
    /// Base URL of the Kakao REST API
    pub kakao_api_base: String,
    /// Directory of the widget's static assets
    pub static_dir: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let admin_password = non_empty("GUESTBOOK_ADMIN_PASSWORD");
        let jwt_secret = non_empty("GUESTBOOK_JWT_SECRET").or_else(|| admin_password.clone());

        let admin_token_ttl_secs = match non_empty("GUESTBOOK_ADMIN_TOKEN_TTL_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ttl| (1..=MAX_ADMIN_TOKEN_TTL_SECS).contains(ttl))
                .ok_or_else(|| format!("Invalid GUESTBOOK_ADMIN_TOKEN_TTL_SECS: {}", raw))?,
            None => 3600,
        };

        let db_path = non_empty("GUESTBOOK_DB_PATH")
            .unwrap_or_else(|| "./data/db.json".to_string())
            .into();

        let bind_raw =
            non_empty("GUESTBOOK_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| format!("Invalid GUESTBOOK_BIND_ADDR format: {}", bind_raw))?;

        let kakao_api_base = non_empty("GUESTBOOK_KAKAO_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_KAKAO_API_BASE.to_string());

        let log_level = non_empty("GUESTBOOK_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            admin_password,
            jwt_secret,
            admin_token_ttl_secs,
            db_path,
            bind_addr,
            domain: non_empty("GUESTBOOK_DOMAIN"),
            kakao_api_base,
            static_dir: non_empty("GUESTBOOK_STATIC_DIR").map(PathBuf::from),
            log_level,
        })
    }

    /// Origin allowed by CORS, if the deployment is pinned to a domain.
    pub fn allowed_origin(&self) -> Option<String> {
        self.domain
            .as_ref()
            .map(|domain| format!("https://{}", domain.trim_start_matches("https://")))
    }
}
