//! Key-value storage for persisted cart snapshots.
//!
//! The store only needs two operations from the device: read a blob by key
//! and overwrite a blob by key. Backends:
//!
//! - [`MemoryStorage`] - in-process map, used by tests and embedders that
//!   bring their own durability
//! - [`FileStorage`] - one JSON file per key under a directory
//! - `PgStorage` - `PostgreSQL` table (requires the `postgres` feature)

mod file;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

use std::future::Future;
use std::sync::Arc;

pub use file::FileStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "postgres")]
pub use postgres::PgStorage;

use crate::error::StorageError;

/// A string-keyed blob store.
///
/// Implementations must be cheap to share with the background persister task.
pub trait CartStorage: Send + Sync + 'static {
    /// Read the blob stored under `key`, or `None` if nothing was stored.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `blob` under `key`, replacing any previous value.
    fn set(&self, key: &str, blob: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl<T: CartStorage> CartStorage for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        (**self).set(key, blob).await
    }
}
