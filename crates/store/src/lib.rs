//! Pineapple Cart Store - Cart state with background persistence.
//!
//! The [`CartStore`] holds the shopper's cart for the lifetime of the app.
//! UI code reads snapshots and calls `add_to_cart`, `increment` and
//! `decrement`; every change is published to subscribers and written to a
//! [`CartStorage`] backend by a background task, so the cart survives
//! restarts.
//!
//! # Example
//!
//! ```no_run
//! use pineapple_cart_core::{NewCartItem, Price, ProductId};
//! use pineapple_cart_store::{AppContext, CartStore, MemoryStorage, StoreConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CartStore::load(MemoryStorage::new(), &StoreConfig::default()).await?;
//! let context = AppContext::new().with_cart(store);
//!
//! let cart = context.cart();
//! cart.add_to_cart(NewCartItem::new(
//!     ProductId::parse("shirt")?,
//!     "Shirt",
//!     "https://cdn.example.com/shirt.png",
//!     Price::from_cents(1000),
//! ));
//! cart.flush().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`store`] - The cart store and subscriptions
//! - [`storage`] - Key-value storage backends
//! - [`context`] - Explicit context handed to screens
//! - [`config`] - Environment configuration
//! - [`codec`] - Persisted blob format

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod persist;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, LoadPolicy, StorageConfig, StoreConfig};
pub use context::AppContext;
pub use error::{LoadError, PersistError, StorageError, UsageError};
pub use persist::PersistStatus;
pub use snapshot::CartSnapshot;
#[cfg(feature = "postgres")]
pub use storage::PgStorage;
pub use storage::{CartStorage, FileStorage, MemoryStorage};
pub use store::{CartStore, CartSubscription};
