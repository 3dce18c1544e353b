//! Background persistence of cart snapshots.
//!
//! The persister watches the same channel as UI subscribers. A watch channel
//! only keeps the newest value, so when the cart changes faster than storage
//! can keep up, intermediate snapshots are skipped and only the latest one is
//! written. Snapshots at or below the last settled sequence are never
//! written, so an older cart cannot overwrite a newer one. The one exception
//! is shutdown: if the newest snapshot failed to write, it is tried once more
//! before the task exits.

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::codec;
use crate::snapshot::CartSnapshot;
use crate::storage::CartStorage;

/// Progress of the background persister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistStatus {
    /// Sequence of the newest snapshot known to be in storage.
    pub committed: u64,
    /// Sequence of the newest snapshot the persister has finished with,
    /// whether the write succeeded or not.
    pub settled: u64,
    /// Number of writes that failed.
    pub failed: u64,
}

impl PersistStatus {
    /// Status for a freshly restored cart at `sequence`.
    pub(crate) const fn restored(sequence: u64) -> Self {
        Self {
            committed: sequence,
            settled: sequence,
            failed: 0,
        }
    }
}

/// Spawn the persister task.
///
/// The task runs until `shutdown` is signalled or the snapshot channel
/// closes. In both cases it writes the last pending snapshot before exiting,
/// retrying it if its earlier write failed.
pub(crate) fn spawn<S: CartStorage>(
    storage: S,
    key: String,
    snapshots: watch::Receiver<CartSnapshot>,
    shutdown: watch::Receiver<bool>,
    status: watch::Sender<PersistStatus>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run(storage, key, snapshots, shutdown, status))
}

#[instrument(skip_all, fields(key = %key))]
async fn run<S: CartStorage>(
    storage: S,
    key: String,
    mut snapshots: watch::Receiver<CartSnapshot>,
    mut shutdown: watch::Receiver<bool>,
    status: watch::Sender<PersistStatus>,
) {
    debug!("Cart persister started");

    loop {
        let closing = tokio::select! {
            changed = snapshots.changed() => changed.is_err(),
            _ = shutdown.changed() => true,
        };

        let snapshot = snapshots.borrow_and_update().clone();
        let PersistStatus { committed, settled, .. } = *status.borrow();
        // The closing pass retries a newest snapshot whose write failed.
        let pending =
            snapshot.sequence() > settled || (closing && snapshot.sequence() > committed);
        if pending {
            write(&storage, &key, &snapshot, &status).await;
        }

        if closing {
            break;
        }
    }

    let committed = status.borrow().committed;
    info!(committed, "Cart persister stopped");
}

async fn write<S: CartStorage>(
    storage: &S,
    key: &str,
    snapshot: &CartSnapshot,
    status: &watch::Sender<PersistStatus>,
) {
    let sequence = snapshot.sequence();

    let written = match codec::encode(snapshot.cart()) {
        Ok(blob) => match storage.set(key, &blob).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, sequence, "Failed to persist cart");
                false
            }
        },
        Err(e) => {
            warn!(error = %e, sequence, "Failed to encode cart");
            false
        }
    };

    if written {
        debug!(sequence, lines = snapshot.cart().len(), "Persisted cart");
    }

    status.send_modify(|status| {
        status.settled = sequence;
        if written {
            status.committed = sequence;
        } else {
            status.failed += 1;
        }
    });
}
