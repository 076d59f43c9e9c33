//! Harness configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MAGENTO_BASE_URL` - Platform base URL (falls back to `URL`)
//!
//! ## Optional
//! - `MAGENTO_STORE_CODE` - Store view code (falls back to `STORE_CODE`, default: default)
//! - `MAGENTO_ADMIN_USERNAME` - Admin user for admin-scoped calls (default: admin)
//! - `MAGENTO_ADMIN_PASSWORD` - Admin password (default: admin123)
//! - `TEST_TIMEOUT` - Per-request timeout in milliseconds, non-zero (default: 10000)
//! - `LOG_LEVEL` - Log filter used when `RUST_LOG` is unset (default: info)
//! - `CLEANUP_TEST_DATA` - Delete created products afterwards; only `true` enables
//! - `TOLERATE_MISSING_CONFIG` - Report environment gaps as skips (default: true)
//! - `CART_ITEM_SHAPE` - `bare` or `with_quote_id` (default: bare)
//! - `INDEXING_DELAY_MS` - Wait after product writes before reading back (default: 2000)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_STORE_CODE: &str = "default";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_TIMEOUT_MS: &str = "10000";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_INDEXING_DELAY_MS: &str = "2000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// What to do when the platform under test lacks something a scenario needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapPolicy {
    /// Log the gap and report the scenario as skipped.
    #[default]
    Tolerate,
    /// Report the scenario as failed.
    Strict,
}

impl fmt::Display for GapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tolerate => write!(f, "tolerate"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Shape of the `cartItem` payload sent when adding to a cart.
///
/// Some installations reject a `quote_id` on add-to-cart, others require
/// it. The choice is fixed per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartItemShape {
    /// `{sku, qty}` only.
    #[default]
    Bare,
    /// `{sku, qty, quote_id}`.
    WithQuoteId,
}

impl FromStr for CartItemShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bare" => Ok(Self::Bare),
            "with_quote_id" | "with-quote-id" => Ok(Self::WithQuoteId),
            other => Err(format!("expected `bare` or `with_quote_id`, got `{other}`")),
        }
    }
}

impl fmt::Display for CartItemShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare => write!(f, "bare"),
            Self::WithQuoteId => write!(f, "with_quote_id"),
        }
    }
}

/// Where the platform lives and how to become admin on it.
///
/// Implements `Debug` manually to redact the admin password.
#[derive(Clone)]
pub struct PlatformConfig {
    /// Base URL, e.g. `https://shop.example.com`
    pub base_url: Url,
    /// Store view code used in storefront URLs
    pub store_code: String,
    pub admin_username: String,
    pub admin_password: SecretString,
}

impl fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("base_url", &self.base_url.as_str())
            .field("store_code", &self.store_code)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[REDACTED]")
            .finish()
    }
}

/// Knobs that shape a test run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Applied to every request unless a call overrides it
    pub request_timeout: Duration,
    pub log_level: String,
    pub cleanup_test_data: bool,
    pub gap_policy: GapPolicy,
    pub cart_item_shape: CartItemShape,
    /// Pause between a product write and the read that expects to see it
    pub indexing_delay: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            cleanup_test_data: false,
            gap_policy: GapPolicy::Tolerate,
            cart_item_shape: CartItemShape::Bare,
            indexing_delay: Duration::from_secs(2),
        }
    }
}

/// Complete harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub platform: PlatformConfig,
    pub run: RunSettings,
}

impl HarnessConfig {
    /// Load configuration from the process environment, reading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is missing or any variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is missing or any variable fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let base_url = parse_base_url(
            "MAGENTO_BASE_URL",
            &env.required_with_fallback("MAGENTO_BASE_URL", "URL")?,
        )?;
        let store_code = env
            .optional_with_fallback("MAGENTO_STORE_CODE", "STORE_CODE")
            .unwrap_or_else(|| DEFAULT_STORE_CODE.to_string());
        let admin_username = env.or_default("MAGENTO_ADMIN_USERNAME", DEFAULT_ADMIN_USERNAME);
        let admin_password =
            SecretString::from(env.or_default("MAGENTO_ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD));

        let request_timeout = parse_timeout(
            "TEST_TIMEOUT",
            &env.or_default("TEST_TIMEOUT", DEFAULT_TIMEOUT_MS),
        )?;
        let log_level = env.or_default("LOG_LEVEL", DEFAULT_LOG_LEVEL);
        let cleanup_test_data = env.optional("CLEANUP_TEST_DATA").as_deref() == Some("true");
        let gap_policy = match env.optional("TOLERATE_MISSING_CONFIG") {
            None => GapPolicy::Tolerate,
            Some(value) => {
                if parse_flag("TOLERATE_MISSING_CONFIG", &value)? {
                    GapPolicy::Tolerate
                } else {
                    GapPolicy::Strict
                }
            }
        };
        let cart_item_shape = env
            .or_default("CART_ITEM_SHAPE", "bare")
            .parse::<CartItemShape>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_ITEM_SHAPE".to_string(), e))?;
        let indexing_delay = parse_millis(
            "INDEXING_DELAY_MS",
            &env.or_default("INDEXING_DELAY_MS", DEFAULT_INDEXING_DELAY_MS),
        )?;

        Ok(Self {
            platform: PlatformConfig {
                base_url,
                store_code,
                admin_username,
                admin_password,
            },
            run: RunSettings {
                request_timeout,
                log_level,
                cleanup_test_data,
                gap_policy,
                cart_item_shape,
                indexing_delay,
            },
        })
    }

    /// Default settings pointed at `base_url`, for in-process platforms.
    #[must_use]
    pub fn for_base_url(base_url: Url) -> Self {
        Self {
            platform: PlatformConfig {
                base_url,
                store_code: DEFAULT_STORE_CODE.to_string(),
                admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
                admin_password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
            },
            run: RunSettings::default(),
        }
    }
}

/// Variable lookup with the usual required/optional/default helpers.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn optional_with_fallback(&self, key: &str, fallback: &str) -> Option<String> {
        self.optional(key).or_else(|| self.optional(fallback))
    }

    fn required_with_fallback(&self, key: &str, fallback: &str) -> Result<String, ConfigError> {
        self.optional_with_fallback(key, fallback)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme `{}`", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Like [`parse_millis`], but zero is rejected: it would time out every request.
fn parse_timeout(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    let timeout = parse_millis(key, raw)?;
    if timeout.is_zero() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "timeout must be greater than zero".to_string(),
        ));
    }
    Ok(timeout)
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected true or false, got `{other}`"),
        )),
    }
}
