//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cart-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/store/migrations/` and are embedded at build time.

use pineapple_cart_store::{PgStorage, StorageConfig};
use tracing::info;

use super::cart::CartCommandError;

/// Create the cart snapshot table.
///
/// # Errors
///
/// Returns an error if no database is configured, the connection fails, or a
/// migration fails to apply.
pub async fn run(config: &pineapple_cart_store::CartConfig) -> Result<(), CartCommandError> {
    let StorageConfig::Postgres { database_url } = &config.storage else {
        return Err(CartCommandError::NoDatabase);
    };

    info!("Connecting to cart database...");
    let storage = PgStorage::connect(database_url).await?;

    info!("Running cart migrations...");
    storage.migrate().await?;

    info!("Cart migrations complete!");
    Ok(())
}
