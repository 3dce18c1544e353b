//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_KEY` - Key the cart blob is stored under (default: `@PineappleCart:products`)
//! - `CART_LOAD_POLICY` - `lenient` or `strict` (default: `lenient`)
//! - `CART_STORAGE_DIR` - Directory for file-backed storage (default: `.pineapple-cart`)
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string, selects the database backend
//!   (falls back to `DATABASE_URL`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// Default key for the cart blob.
pub const DEFAULT_STORAGE_KEY: &str = "@PineappleCart:products";

const DEFAULT_STORAGE_DIR: &str = ".pineapple-cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// What to do when the persisted cart cannot be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Log a warning and start with an empty cart.
    #[default]
    Lenient,
    /// Return the error to the caller.
    Strict,
}

impl FromStr for LoadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("invalid load policy: {s} (expected lenient or strict)")),
        }
    }
}

/// Settings for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key the cart blob is read from and written to
    pub storage_key: String,
    /// Behavior when the persisted blob is unreadable
    pub load_policy: LoadPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            load_policy: LoadPolicy::default(),
        }
    }
}

/// Where persisted carts live.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// One file per key under this directory.
    File {
        /// Directory holding the blobs
        dir: PathBuf,
    },
    /// `PostgreSQL` table `cart.snapshot`.
    Postgres {
        /// Connection URL (contains password)
        database_url: SecretString,
    },
}

/// Full cart configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Store behavior
    pub store: StoreConfig,
    /// Storage backend selection
    pub storage: StorageConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl CartConfig {
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
        let storage_key = get_or_default(&lookup, "CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        let load_policy = get_or_default(&lookup, "CART_LOAD_POLICY", "lenient")
            .parse::<LoadPolicy>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_LOAD_POLICY".to_string(), e))?;

        let storage = match get_database_url(&lookup, "CART_DATABASE_URL") {
            Some(database_url) => StorageConfig::Postgres { database_url },
            None => StorageConfig::File {
                dir: PathBuf::from(get_or_default(
                    &lookup,
                    "CART_STORAGE_DIR",
                    DEFAULT_STORAGE_DIR,
                )),
            },
        };

        Ok(Self {
            store: StoreConfig {
                storage_key,
                load_policy,
            },
            storage,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(
    lookup: &impl Fn(&str) -> Option<String>,
    primary_key: &str,
) -> Option<SecretString> {
    lookup(primary_key)
        .or_else(|| lookup("DATABASE_URL"))
        .filter(|url| !url.is_empty())
        .map(SecretString::from)
}
