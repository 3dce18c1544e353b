//! The cart store.
//!
//! [`CartStore`] owns the authoritative cart for the running app. Mutations
//! apply synchronously and publish a complete [`CartSnapshot`] to every
//! subscriber; the background persister is one of those subscribers and
//! writes the snapshot to storage on its own schedule.
//!
//! Persistence is best effort: a failed write is logged and counted in
//! [`PersistStatus`] but never rolls back the in-memory cart.

use std::sync::{Arc, Mutex, PoisonError};

use pineapple_cart_core::{Cart, CartChange, CartItem, NewCartItem, ProductId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::codec;
use crate::config::{LoadPolicy, StoreConfig};
use crate::error::{LoadError, PersistError};
use crate::persist::{self, PersistStatus};
use crate::snapshot::CartSnapshot;
use crate::storage::CartStorage;

/// Handle to the cart.
///
/// This struct is cheaply cloneable via `Arc`; every clone refers to the same
/// cart. Must be created inside a tokio runtime, since it spawns the
/// persister task.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage_key: String,
    snapshots: watch::Sender<CartSnapshot>,
    status: watch::Receiver<PersistStatus>,
    shutdown: watch::Sender<bool>,
    persister: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.inner.snapshots.borrow();
        f.debug_struct("CartStore")
            .field("storage_key", &self.inner.storage_key)
            .field("sequence", &snapshot.sequence())
            .field("lines", &snapshot.cart().len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Restore the cart persisted under `config.storage_key` and start the
    /// persister.
    ///
    /// A missing blob yields an empty cart. An unreadable blob yields an empty
    /// cart under [`LoadPolicy::Lenient`] and an error under
    /// [`LoadPolicy::Strict`].
    ///
    /// # Errors
    ///
    /// Returns `LoadError` only under [`LoadPolicy::Strict`].
    #[instrument(skip_all, fields(key = %config.storage_key))]
    pub async fn load<S: CartStorage>(
        storage: S,
        config: &StoreConfig,
    ) -> Result<Self, LoadError> {
        let cart = match read_cart(&storage, &config.storage_key).await {
            Ok(Some(cart)) => {
                info!(lines = cart.len(), items = cart.item_count(), "Restored cart");
                cart
            }
            Ok(None) => {
                debug!("No persisted cart, starting empty");
                Cart::new()
            }
            Err(e) => match config.load_policy {
                LoadPolicy::Lenient => {
                    warn!(error = %e, "Failed to restore cart, starting empty");
                    Cart::new()
                }
                LoadPolicy::Strict => return Err(e),
            },
        };

        Ok(Self::with_cart(storage, config.storage_key.clone(), cart))
    }

    /// Start a store from an already loaded cart.
    ///
    /// The initial cart is treated as already persisted; only later changes
    /// are written under `storage_key`.
    #[must_use]
    pub fn with_cart<S: CartStorage>(
        storage: S,
        storage_key: impl Into<String>,
        cart: Cart,
    ) -> Self {
        let storage_key = storage_key.into();
        let (snapshots, snapshot_rx) = watch::channel(CartSnapshot::new(0, cart));
        let (status_tx, status) = watch::channel(PersistStatus::restored(0));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let handle = persist::spawn(
            storage,
            storage_key.clone(),
            snapshot_rx,
            shutdown_rx,
            status_tx,
        );

        Self {
            inner: Arc::new(CartStoreInner {
                storage_key,
                snapshots,
                status,
                shutdown,
                persister: Mutex::new(Some(handle)),
            }),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `item` to the cart.
    ///
    /// A product already in the cart is incremented instead, keeping its
    /// stored title, image and price.
    pub fn add_to_cart(&self, item: NewCartItem) -> CartChange {
        let id = item.id.clone();
        let change = self.apply(|cart| cart.add(item));
        debug!(product_id = %id, ?change, "add_to_cart");
        change
    }

    /// Add one unit to the line for `id`. Unknown identifiers are ignored.
    pub fn increment(&self, id: &ProductId) -> CartChange {
        let change = self.apply(|cart| cart.increment(id));
        debug!(product_id = %id, ?change, "increment");
        change
    }

    /// Take one unit from the line for `id`, removing it at zero. Unknown
    /// identifiers are ignored.
    pub fn decrement(&self, id: &ProductId) -> CartChange {
        let change = self.apply(|cart| cart.decrement(id));
        debug!(product_id = %id, ?change, "decrement");
        change
    }

    /// Run `op` against the current cart and publish the result if it
    /// changed anything.
    fn apply(&self, op: impl FnOnce(&mut Cart) -> CartChange) -> CartChange {
        let mut change = CartChange::Unchanged;
        self.inner.snapshots.send_if_modified(|snapshot| {
            change = op(Arc::make_mut(&mut snapshot.cart));
            if change.is_modified() {
                snapshot.sequence += 1;
            }
            change.is_modified()
        });
        change
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// The current lines, in cart order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.inner.snapshots.borrow().items().to_vec()
    }

    /// Look up a single line.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<CartItem> {
        self.inner.snapshots.borrow().cart().get(id).cloned()
    }

    /// Subscribe to cart changes.
    ///
    /// The subscription starts at the current snapshot; only later changes
    /// are reported by [`CartSubscription::changed`].
    #[must_use]
    pub fn subscribe(&self) -> CartSubscription {
        CartSubscription {
            rx: self.inner.snapshots.subscribe(),
        }
    }

    /// Key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Progress of the background persister.
    #[must_use]
    pub fn persist_status(&self) -> PersistStatus {
        *self.inner.status.borrow()
    }

    /// Wait until every snapshot published so far has been handled by the
    /// persister.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::NotPersisted` if the newest snapshot could not be
    /// written, and `PersistError::Stopped` if the persister exited before
    /// reaching it.
    pub async fn flush(&self) -> Result<(), PersistError> {
        let sequence = self.inner.snapshots.borrow().sequence();
        let mut status = self.inner.status.clone();

        let settled = status
            .wait_for(|status| status.settled >= sequence)
            .await
            .map(|status| *status);

        match settled {
            Ok(status) if status.committed >= sequence => Ok(()),
            Ok(_) => Err(PersistError::NotPersisted { sequence }),
            Err(_) => Err(PersistError::Stopped),
        }
    }

    /// Stop the persister after it writes the latest snapshot.
    ///
    /// Changes made after shutdown still reach subscribers but are no longer
    /// persisted. Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        self.inner.shutdown.send_replace(true);

        let handle = self
            .inner
            .persister
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Cart persister task failed");
            }
        }
    }
}

/// Read and decode the blob stored under `key`.
async fn read_cart<S: CartStorage>(storage: &S, key: &str) -> Result<Option<Cart>, LoadError> {
    let Some(blob) = storage.get(key).await? else {
        return Ok(None);
    };
    Ok(Some(codec::decode(&blob)?))
}

/// A stream of cart snapshots for one consumer.
#[derive(Debug, Clone)]
pub struct CartSubscription {
    rx: watch::Receiver<CartSnapshot>,
}

impl CartSubscription {
    /// Wait for the next change and return the snapshot it produced.
    ///
    /// Changes that happen faster than the consumer reads them are collapsed:
    /// the consumer always sees the newest snapshot. Returns `None` once the
    /// store has been dropped.
    pub async fn changed(&mut self) -> Option<CartSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// The newest snapshot, without waiting.
    #[must_use]
    pub fn current(&self) -> CartSnapshot {
        self.rx.borrow().clone()
    }
}
