//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `MERCATO_API_URL` - Backend REST API base URL (default: `http://localhost:3000/api`)
//! - `MERCATO_ACCESS_TOKEN` - Bearer token attached to every API request
//! - `MERCATO_DATA_DIR` - Directory for local storage such as the wishlist (default: `.mercato`)
//! - `MERCATO_CURRENCY` - Display currency for prices and discounts (default: `INR`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use mercato_core::CurrencyCode;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_DATA_DIR: &str = ".mercato";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Directory holding local storage files
    pub data_dir: PathBuf,
    /// Currency used when formatting prices and fixed discounts
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Backend REST API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Bearer token for authenticated requests
    pub access_token: Option<SecretString>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ApiConfig {
    /// Config pointing at `base_url` with no token.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not a URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("MERCATO_API_URL", base_url)?,
            access_token: None,
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let base_url = parse_url(
            "MERCATO_API_URL",
            &get_or_default("MERCATO_API_URL", DEFAULT_API_URL),
        )?;
        let access_token = lookup("MERCATO_ACCESS_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .map(|v| validate_token(v.trim(), "MERCATO_ACCESS_TOKEN"))
            .transpose()?;
        let data_dir = PathBuf::from(get_or_default("MERCATO_DATA_DIR", DEFAULT_DATA_DIR));
        let currency = get_or_default("MERCATO_CURRENCY", "INR")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("MERCATO_CURRENCY".to_string(), e))?;
        let sentry_dsn = lookup("SENTRY_DSN").filter(|v| !v.trim().is_empty());

        Ok(Self {
            api: ApiConfig {
                base_url,
                access_token,
            },
            data_dir,
            currency,
            sentry_dsn,
        })
    }

    /// Token value for the `Authorization` header, if configured.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.api
            .access_token
            .as_ref()
            .map(ExposeSecret::expose_secret)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Reject obvious placeholder tokens copied from sample `.env` files.
fn validate_token(token: &str, var_name: &str) -> Result<SecretString, ConfigError> {
    let lower = token.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InvalidEnvVar(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(SecretString::from(token.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:3000/api");
        assert!(config.api.access_token.is_none());
        assert_eq!(config.data_dir, PathBuf::from(".mercato"));
        assert_eq!(config.currency, CurrencyCode::INR);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("MERCATO_API_URL", "https://api.mercato94.com/v1"),
            ("MERCATO_ACCESS_TOKEN", "eyJhbGciOiJIUzI1NiJ9.abc.def"),
            ("MERCATO_DATA_DIR", "/tmp/mercato"),
            ("MERCATO_CURRENCY", "usd"),
        ]))
        .unwrap();
        assert_eq!(config.api.base_url.host_str(), Some("api.mercato94.com"));
        assert_eq!(config.bearer_token(), Some("eyJhbGciOiJIUzI1NiJ9.abc.def"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/mercato"));
        assert_eq!(config.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_invalid_url() {
        let err = StorefrontConfig::from_lookup(lookup(&[("MERCATO_API_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "MERCATO_API_URL"));

        let err = StorefrontConfig::from_lookup(lookup(&[("MERCATO_API_URL", "ftp://files.example.com")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_currency() {
        let err = StorefrontConfig::from_lookup(lookup(&[("MERCATO_CURRENCY", "DOGE")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "MERCATO_CURRENCY"));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let result =
            StorefrontConfig::from_lookup(lookup(&[("MERCATO_ACCESS_TOKEN", "your-token-here")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("MERCATO_API_URL", "  "),
            ("MERCATO_ACCESS_TOKEN", ""),
        ]))
        .unwrap();
        assert_eq!(config.api.base_url.as_str(), DEFAULT_API_URL);
        assert!(config.bearer_token().is_none());
    }

    #[test]
    fn test_api_config_debug_redacts_token() {
        let config = ApiConfig {
            base_url: Url::parse("https://api.example.com").unwrap(),
            access_token: Some(SecretString::from("super_secret_token_value")),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("api.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token_value"));
    }
}
