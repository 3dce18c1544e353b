//! Error types for the cart store.
//!
//! In-memory cart operations cannot fail; only the storage boundary and
//! misuse of the context have error surfaces.

use pineapple_cart_core::CartError;
use thiserror::Error;

/// The storage collaborator failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed.
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration failed.
    #[cfg(feature = "postgres")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The backend cannot be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Restoring the persisted cart failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The blob could not be read.
    #[error("Failed to read persisted cart: {0}")]
    Storage(#[from] StorageError),

    /// The blob is not a valid list of cart items.
    #[error("Failed to decode persisted cart: {0}")]
    Decode(#[from] serde_json::Error),

    /// The blob decoded but breaks a cart invariant.
    #[error("Persisted cart is invalid: {0}")]
    Invalid(#[from] CartError),
}

/// The latest snapshot did not reach storage.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PersistError {
    /// The write for this sequence (or a later one) failed.
    #[error("Cart snapshot {sequence} was not persisted")]
    NotPersisted {
        /// Sequence of the snapshot that was expected in storage.
        sequence: u64,
    },

    /// The background persister is no longer running.
    #[error("Cart persister has stopped")]
    Stopped,
}

/// The cart was used somewhere it was never provided.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    /// No cart store was attached to the context.
    #[error("use_cart must be used within a cart provider: attach a CartStore with AppContext::with_cart")]
    MissingProvider,
}
