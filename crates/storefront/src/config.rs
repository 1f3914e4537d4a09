//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `PBS_HOST` - Bind address (default: 127.0.0.1)
//! - `PBS_PORT` - Listen port (default: 3000)
//! - `PBS_DATA_DIR` - Directory holding the persisted cart (default: .pbs)
//! - `PBS_CART_KEY` - Storage key of the cart record (default: pbs-cart)
//! - `PBS_CATALOG_PATH` - Product catalog JSON file (default: embedded seed)
//! - `PBS_CHECKOUT_DELAY_MS` - Simulated order round trip (default: 800)
//! - `PBS_CHECKOUT_TIMEOUT_MS` - Submission timeout (default: 10000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cart::DEFAULT_CART_KEY;
use crate::checkout::CheckoutSettings;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory the cart record is written to
    pub data_dir: PathBuf,
    /// File stem of the cart record
    pub cart_key: String,
    /// Catalog file, or `None` for the embedded seed
    pub catalog_path: Option<PathBuf>,
    /// Checkout timing
    pub checkout: CheckoutSettings,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: PathBuf::from(".pbs"),
            cart_key: DEFAULT_CART_KEY.to_string(),
            catalog_path: None,
            checkout: CheckoutSettings::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default::<IpAddr>(&lookup, "PBS_HOST", "127.0.0.1")?;
        let port = parse_or_default::<u16>(&lookup, "PBS_PORT", "3000")?;
        let data_dir = PathBuf::from(get_env_or_default(&lookup, "PBS_DATA_DIR", ".pbs"));
        let cart_key = get_env_or_default(&lookup, "PBS_CART_KEY", DEFAULT_CART_KEY);
        validate_cart_key(&cart_key)?;
        let catalog_path = get_optional_env(&lookup, "PBS_CATALOG_PATH").map(PathBuf::from);

        let delay = Duration::from_millis(parse_or_default::<u64>(
            &lookup,
            "PBS_CHECKOUT_DELAY_MS",
            "800",
        )?);
        let timeout = Duration::from_millis(parse_or_default::<u64>(
            &lookup,
            "PBS_CHECKOUT_TIMEOUT_MS",
            "10000",
        )?);
        if timeout <= delay {
            return Err(ConfigError::InvalidEnvVar(
                "PBS_CHECKOUT_TIMEOUT_MS".to_string(),
                format!(
                    "must be greater than PBS_CHECKOUT_DELAY_MS ({} ms)",
                    delay.as_millis()
                ),
            ));
        }

        Ok(Self {
            host,
            port,
            data_dir,
            cart_key,
            catalog_path,
            checkout: CheckoutSettings { delay, timeout },
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(lookup, key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// The cart key becomes a file name, so keep it to a safe alphabet.
fn validate_cart_key(key: &str) -> Result<(), ConfigError> {
    if key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "PBS_CART_KEY".to_string(),
            "may only contain letters, digits, '-' and '_'".to_string(),
        ))
    }
}
