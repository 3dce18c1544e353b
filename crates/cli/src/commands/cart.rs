//! Cart inspection and editing commands.
//!
//! Each command restores the cart from the configured storage, applies at
//! most one change, and waits for the persister before returning so the
//! change is on disk when the process exits.

use std::fmt::Write as _;

use pineapple_cart_core::{CartChange, NewCartItem, Price, PriceError, ProductId, ProductIdError};
use pineapple_cart_store::{
    CartConfig, CartSnapshot, CartStore, FileStorage, LoadError, PersistError, StorageConfig,
    StorageError,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The product identifier is malformed.
    #[error("Invalid product id: {0}")]
    InvalidId(#[from] ProductIdError),

    /// The price is malformed.
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// The stored cart could not be restored.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The change did not reach storage.
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A database backend is configured but support was not compiled in.
    #[cfg(not(feature = "postgres"))]
    #[error("CART_DATABASE_URL is set but cart-cli was built without the postgres feature")]
    PostgresDisabled,

    /// The command needs a database but none is configured.
    #[cfg(feature = "postgres")]
    #[error("No database configured: set CART_DATABASE_URL")]
    NoDatabase,
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if the stored cart cannot be restored.
pub async fn show(config: &CartConfig) -> Result<(), CartCommandError> {
    let store = open_store(config).await?;
    print_cart(&store.snapshot());
    store.shutdown().await;
    Ok(())
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the input is invalid or the change cannot be persisted.
pub async fn add(
    config: &CartConfig,
    id: &str,
    title: String,
    image_url: String,
    price: Decimal,
) -> Result<(), CartCommandError> {
    let item = NewCartItem::new(ProductId::parse(id)?, title, image_url, Price::new(price)?);
    let store = open_store(config).await?;

    let change = store.add_to_cart(item);
    finish(&store, id, change).await
}

/// Add one unit to an existing line.
///
/// # Errors
///
/// Returns an error if the identifier is invalid or the change cannot be
/// persisted.
pub async fn increment(config: &CartConfig, id: &str) -> Result<(), CartCommandError> {
    let product_id = ProductId::parse(id)?;
    let store = open_store(config).await?;

    let change = store.increment(&product_id);
    finish(&store, id, change).await
}

/// Remove one unit from a line.
///
/// # Errors
///
/// Returns an error if the identifier is invalid or the change cannot be
/// persisted.
pub async fn decrement(config: &CartConfig, id: &str) -> Result<(), CartCommandError> {
    let product_id = ProductId::parse(id)?;
    let store = open_store(config).await?;

    let change = store.decrement(&product_id);
    finish(&store, id, change).await
}

/// Restore the cart from the configured backend.
async fn open_store(config: &CartConfig) -> Result<CartStore, CartCommandError> {
    match &config.storage {
        StorageConfig::File { dir } => {
            info!(dir = %dir.display(), "Using file storage");
            Ok(CartStore::load(FileStorage::new(dir), &config.store).await?)
        }
        #[cfg(feature = "postgres")]
        StorageConfig::Postgres { database_url } => {
            info!("Using database storage");
            let storage = pineapple_cart_store::PgStorage::connect(database_url).await?;
            Ok(CartStore::load(storage, &config.store).await?)
        }
        #[cfg(not(feature = "postgres"))]
        StorageConfig::Postgres { .. } => Err(CartCommandError::PostgresDisabled),
    }
}

/// Wait for the change to be written, then print the result.
async fn finish(store: &CartStore, id: &str, change: CartChange) -> Result<(), CartCommandError> {
    let flushed = store.flush().await;
    store.shutdown().await;
    flushed?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", describe_change(id, change));
    }
    print_cart(&store.snapshot());
    Ok(())
}

fn print_cart(snapshot: &CartSnapshot) {
    #[allow(clippy::print_stdout)]
    {
        print!("{}", render_cart(snapshot));
    }
}

/// One-line summary of a change.
fn describe_change(id: &str, change: CartChange) -> String {
    match change {
        CartChange::Added => format!("Added {id}"),
        CartChange::Incremented { quantity } | CartChange::Decremented { quantity } => {
            format!("{id} is now x{quantity}")
        }
        CartChange::Removed => format!("Removed {id}"),
        CartChange::Unchanged => format!("{id} is not in the cart"),
    }
}

/// Render the cart as a table.
fn render_cart(snapshot: &CartSnapshot) -> String {
    let cart = snapshot.cart();
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let id_width = cart
        .items()
        .iter()
        .map(|item| item.id.as_str().chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!("Cart ({} lines, {} items)\n", cart.len(), cart.item_count());
    for item in cart.items() {
        let _ = writeln!(
            out,
            "  {:<id_width$}  x{:<3} {:>10}  {}",
            item.id.as_str(),
            item.quantity.get(),
            item.price.to_string(),
            item.title,
        );
    }
    out
}
