use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Every setting has a default; the model credential is supplied per session,
/// never through the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base URL for the embeddings and chat-completion endpoints.
    pub openai_api_base: String,
    pub http_timeout_secs: u64,
    /// Upper bound on an uploaded resume, in bytes.
    pub max_upload_bytes: usize,
    /// Sessions idle for longer than this are treated as ended.
    pub session_idle_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            openai_api_base: std::env::var("OPENAI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_BASE.to_string()),
            http_timeout_secs: env_or("HTTP_TIMEOUT_SECS", 120)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            session_idle_ttl_secs: env_or("SESSION_IDLE_TTL_SECS", 3600)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            openai_api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            http_timeout_secs: 120,
            max_upload_bytes: 10 * 1024 * 1024,
            session_idle_ttl_secs: 3600,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
