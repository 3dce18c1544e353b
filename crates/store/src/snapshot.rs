//! Published cart snapshots.

use std::sync::Arc;

use pineapple_cart_core::{Cart, CartItem};

/// The complete cart at one point in time.
///
/// Every change to the cart publishes a new snapshot with a higher
/// `sequence`. Snapshots are immutable and cheap to clone; holding one never
/// blocks the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartSnapshot {
    pub(crate) sequence: u64,
    pub(crate) cart: Arc<Cart>,
}

impl CartSnapshot {
    pub(crate) fn new(sequence: u64, cart: Cart) -> Self {
        Self {
            sequence,
            cart: Arc::new(cart),
        }
    }

    /// Monotonic version of this snapshot. The restored cart is sequence 0.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The lines, in cart order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }
}
