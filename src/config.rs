//! Configuration module for environment variables and application settings

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream API configuration
    pub api: ApiConfig,

    /// Server configuration
    pub server: ServerConfig,

    /// Session configuration
    pub session: SessionConfig,

    /// Expose `/debug/session`. Never enable in production.
    pub debug_routes: bool,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Lifetime of a session after its last write
    pub ttl_secs: u64,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
    /// How often expired sessions are purged from the store
    pub purge_interval_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("API_BASE_URL")
            .unwrap_or_else(|| "https://flaskapiexample-production.up.railway.app".to_string());
        let parsed = url::Url::parse(&base_url).context("API_BASE_URL is not a valid URL")?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(anyhow!("API_BASE_URL must use http or https, got {}", parsed.scheme()));
        }

        let config = Self {
            api: ApiConfig {
                base_url,
                timeout_secs: lookup("API_TIMEOUT_SECS")
                    .unwrap_or_else(|| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },

            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("PORT")
                    .unwrap_or_else(|| "5000".to_string())
                    .parse()
                    .unwrap_or(5000),
            },

            session: SessionConfig {
                ttl_secs: lookup("SESSION_TTL_SECS")
                    .unwrap_or_else(|| "3600".to_string())
                    .parse()
                    .unwrap_or(3600),
                cookie_secure: lookup("SESSION_COOKIE_SECURE")
                    .map(|v| parse_flag(&v))
                    .unwrap_or(false),
                purge_interval_secs: lookup("SESSION_PURGE_INTERVAL_SECS")
                    .unwrap_or_else(|| "60".to_string())
                    .parse()
                    .unwrap_or(60),
            },

            debug_routes: lookup("DEBUG_ROUTES").map(|v| parse_flag(&v)).unwrap_or(false),
        };

        if config.api.timeout_secs == 0 {
            return Err(anyhow!("API_TIMEOUT_SECS must be greater than zero"));
        }
        if config.session.ttl_secs == 0 {
            return Err(anyhow!("SESSION_TTL_SECS must be greater than zero"));
        }
        if config.session.purge_interval_secs == 0 {
            return Err(anyhow!("SESSION_PURGE_INTERVAL_SECS must be greater than zero"));
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "True" | "on" | "ON" | "yes")
}
