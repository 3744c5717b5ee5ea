//! Widget configuration.
//!
//! Every setting has a default, so a host can start with
//! [`UpsellConfig::default()`] and override from the environment:
//!
//! | variable | setting | default |
//! |----------|---------|---------|
//! | `UPSELL_CATALOG_ENDPOINT` | `catalog.endpoint` | `http://localhost:3000/api/graphql` |
//! | `UPSELL_CATALOG_TOKEN` | `catalog.access_token` | unset |
//! | `UPSELL_CATALOG_TOKEN_HEADER` | `catalog.token_header` | `X-Shopify-Storefront-Access-Token` |
//! | `UPSELL_BATCH_SIZE` | `catalog.batch_size` | `5` |
//! | `UPSELL_TAG` | `catalog.tag` | `upsell` |
//! | `UPSELL_CATALOG_TIMEOUT_MS` | `catalog.timeout_ms` | `10000` |
//! | `UPSELL_ERROR_BANNER_MS` | `error_banner_ms` | `3000` |
//! | `UPSELL_LOG` | `log_filter` | `checkout_upsell=info,checkout_upsell_runtime=info` |

use crate::catalog::{DEFAULT_BATCH_SIZE, DEFAULT_UPSELL_TAG};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// How long the failed-add banner stays visible
pub const DEFAULT_ERROR_BANNER_MS: u64 = 3000;

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A setting could not be parsed or is out of range
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        /// Environment variable or setting name
        key: String,
        /// Offending value
        value: String,
        /// What was wrong with it
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Catalog endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Storefront access token, if the endpoint requires one
    pub access_token: Option<String>,
    /// Header carrying the access token
    pub token_header: String,
    /// Candidates requested per activation
    pub batch_size: u32,
    /// Product tag marking upsell-eligible items
    pub tag: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl CatalogConfig {
    /// Validate catalog settings
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty endpoint or tag, a zero
    /// batch size, or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::invalid("catalog.endpoint", &self.endpoint, "must not be empty"));
        }
        if self.tag.trim().is_empty() {
            return Err(ConfigError::invalid("catalog.tag", &self.tag, "must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::invalid("catalog.batch_size", "0", "must be > 0"));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid("catalog.timeout_ms", "0", "must be > 0"));
        }
        Ok(())
    }

    /// Request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/graphql".to_string(),
            access_token: None,
            token_header: "X-Shopify-Storefront-Access-Token".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            tag: DEFAULT_UPSELL_TAG.to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Top-level widget configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsellConfig {
    /// Catalog endpoint settings
    pub catalog: CatalogConfig,
    /// Failed-add banner lifetime in milliseconds
    pub error_banner_ms: u64,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for UpsellConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            error_banner_ms: DEFAULT_ERROR_BANNER_MS,
            log_filter: "checkout_upsell=info,checkout_upsell_runtime=info".to_string(),
        }
    }
}

impl UpsellConfig {
    /// Load from `UPSELL_*` environment variables over the defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is malformed or the
    /// resulting configuration fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source over the defaults
    ///
    /// # Errors
    ///
    /// Same as [`UpsellConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("UPSELL_CATALOG_ENDPOINT") {
            config.catalog.endpoint = endpoint;
        }
        if let Some(token) = lookup("UPSELL_CATALOG_TOKEN") {
            config.catalog.access_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(header) = lookup("UPSELL_CATALOG_TOKEN_HEADER") {
            config.catalog.token_header = header;
        }
        if let Some(tag) = lookup("UPSELL_TAG") {
            config.catalog.tag = tag;
        }
        if let Some(batch_size) = parse_var(&lookup, "UPSELL_BATCH_SIZE")? {
            config.catalog.batch_size = batch_size;
        }
        if let Some(timeout_ms) = parse_var(&lookup, "UPSELL_CATALOG_TIMEOUT_MS")? {
            config.catalog.timeout_ms = timeout_ms;
        }
        if let Some(banner_ms) = parse_var(&lookup, "UPSELL_ERROR_BANNER_MS")? {
            config.error_banner_ms = banner_ms;
        }
        if let Some(filter) = lookup("UPSELL_LOG") {
            config.log_filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate all settings
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first setting out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog.validate()?;
        if self.error_banner_ms == 0 {
            return Err(ConfigError::invalid("error_banner_ms", "0", "must be > 0"));
        }
        Ok(())
    }

    /// Failed-add banner lifetime
    #[must_use]
    pub const fn error_banner_duration(&self) -> Duration {
        Duration::from_millis(self.error_banner_ms)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::invalid(key, raw.as_str(), e.to_string()))
        })
        .transpose()
}
