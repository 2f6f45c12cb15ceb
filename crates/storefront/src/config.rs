//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ECWID_STORE_ID` - Numeric Ecwid store id
//! - `ECWID_API_KEY` - Ecwid REST API secret token
//! - `ECWID_REVALIDATION_SECRET` - Shared secret expected on revalidation
//!   webhooks (min 16 chars, high entropy)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `ECWID_API_URL` - Admin REST API base (default: <https://app.ecwid.com/api/v3/>)
//! - `ECWID_STOREFRONT_API_URL` - Storefront API base
//!   (default: <https://app.ecwid.com/storefront/api/v1/>)
//! - `ECWID_CACHE_TTL_SECS` - Response cache TTL in seconds (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Default Ecwid admin REST API base URL.
pub const DEFAULT_ECWID_API_URL: &str = "https://app.ecwid.com/api/v3/";

/// Default Ecwid storefront API base URL.
pub const DEFAULT_ECWID_STOREFRONT_API_URL: &str = "https://app.ecwid.com/storefront/api/v1/";

const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const MIN_REVALIDATION_SECRET_LENGTH: usize = 16;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Ecwid API configuration
    pub ecwid: EcwidConfig,
    /// Shared secret for the revalidation webhook
    pub revalidation_secret: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Ecwid API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct EcwidConfig {
    /// Numeric store id, appended to both API bases
    pub store_id: String,
    /// REST API secret token (server-side only)
    pub api_key: SecretString,
    /// Admin REST API base URL, with trailing slash
    pub api_url: String,
    /// Storefront API base URL, with trailing slash
    pub storefront_api_url: String,
    /// How long tagged responses stay cached
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for EcwidConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcwidConfig")
            .field("store_id", &self.store_id)
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("storefront_api_url", &self.storefront_api_url)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the revalidation secret fails validation (length, placeholder
    /// detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let ecwid = EcwidConfig::from_env()?;

        let revalidation_secret = get_validated_secret("ECWID_REVALIDATION_SECRET")?;
        validate_secret_length(&revalidation_secret, "ECWID_REVALIDATION_SECRET")?;

        Ok(Self {
            host,
            port,
            ecwid,
            revalidation_secret,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EcwidConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let store_id = get_required_env("ECWID_STORE_ID")?;
        if store_id.is_empty() || !store_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar(
                "ECWID_STORE_ID".to_string(),
                "must be a numeric store id".to_string(),
            ));
        }

        let ttl_secs =
            get_env_or_default("ECWID_CACHE_TTL_SECS", &DEFAULT_CACHE_TTL_SECS.to_string())
                .parse::<u64>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar("ECWID_CACHE_TTL_SECS".to_string(), e.to_string())
                })?;

        Ok(Self {
            store_id,
            // Ecwid tokens are prefixed `secret_`, so no placeholder check here
            api_key: get_required_secret("ECWID_API_KEY")?,
            api_url: with_trailing_slash(get_env_or_default(
                "ECWID_API_URL",
                DEFAULT_ECWID_API_URL,
            )),
            storefront_api_url: with_trailing_slash(get_env_or_default(
                "ECWID_STOREFRONT_API_URL",
                DEFAULT_ECWID_STOREFRONT_API_URL,
            )),
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    if value.is_empty() {
        return Err(ConfigError::MissingEnvVar(key.to_string()));
    }
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Validate that a secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_REVALIDATION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_REVALIDATION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
