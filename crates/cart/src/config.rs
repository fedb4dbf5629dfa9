//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CART_API_BASE_URL` - Base URL of the inventory/catalog API
//!   (serves `/stock/{id}` and `/products/{id}`)
//!
//! ## Optional
//! - `CART_API_TOKEN` - Bearer token sent to the API
//! - `CART_STORAGE_DIR` - Directory holding the persisted cart (default: .rocket-shoes)
//! - `CART_STORAGE_KEY` - Key the cart blob is stored under (default: @RocketShoes:cart)
//! - `CART_CATALOG_CACHE_TTL_SECS` - Catalog cache TTL, 0 disables (default: 300)
//! - `CART_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Key the cart blob is stored under unless overridden.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_STORAGE_DIR: &str = ".rocket-shoes";
const DEFAULT_CATALOG_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Inventory and catalog API configuration
    pub api: ApiConfig,
    /// Directory the file store writes into
    pub storage_dir: PathBuf,
    /// Fixed key identifying the cart blob
    pub storage_key: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

/// Inventory/catalog API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `http://localhost:3333`
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Catalog cache TTL; `None` disables caching. Stock is never cached.
    pub catalog_cache_ttl: Option<Duration>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("catalog_cache_ttl", &self.catalog_cache_ttl)
            .finish()
    }
}

/// Log output format for the binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

impl ApiConfig {
    /// API configuration pointing at `base_url` with no token and no cache.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            catalog_cache_ttl: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let base_url = env.required("CART_API_BASE_URL")?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("CART_API_BASE_URL".to_string(), e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_API_BASE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let ttl_secs = env
            .or_default("CART_CATALOG_CACHE_TTL_SECS", DEFAULT_CATALOG_CACHE_TTL_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CART_CATALOG_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;
        let catalog_cache_ttl = (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs));

        let log_format = env
            .or_default("CART_LOG_FORMAT", "pretty")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_LOG_FORMAT".to_string(), e))?;

        Ok(Self {
            api: ApiConfig {
                base_url,
                token: env.optional("CART_API_TOKEN").map(SecretString::from),
                catalog_cache_ttl,
            },
            storage_dir: PathBuf::from(env.or_default("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            storage_key: env.or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY),
            log_format,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}
