//! The cart state machine.
//!
//! [`Cart`] is a plain ordered list of [`CartItem`]s with unique identifiers.
//! It performs no I/O; persistence and change notification live in
//! `pineapple-cart-store`.
//!
//! Each line moves through:
//!
//! ```text
//! absent ──add──▶ present(1) ──add/increment──▶ present(n+1)
//!    ▲                │
//!    └──decrement─────┘ (at 1)      present(n) ──decrement──▶ present(n-1)
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{CartItem, NewCartItem, ProductId, Quantity};

/// Errors that can occur when building a [`Cart`] from raw items.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Two lines share the same product identifier.
    #[error("duplicate cart item: {0}")]
    DuplicateItem(ProductId),
}

/// Outcome of a cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended with a single unit.
    Added,
    /// An existing line gained a unit.
    Incremented {
        /// Quantity after the change.
        quantity: Quantity,
    },
    /// An existing line lost a unit and is still in the cart.
    Decremented {
        /// Quantity after the change.
        quantity: Quantity,
    },
    /// The last unit was taken away and the line is gone.
    Removed,
    /// The identifier is not in the cart; nothing happened.
    Unchanged,
}

impl CartChange {
    /// Whether the cart contents differ after this change.
    #[must_use]
    pub const fn is_modified(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// An ordered collection of line items.
///
/// Operations keep the relative order of untouched lines. Incrementing or
/// decrementing a line updates it in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from previously stored lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::DuplicateItem` if two lines share an identifier.
    pub fn from_items(items: Vec<CartItem>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(CartError::DuplicateItem(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Add one unit of `item`.
    ///
    /// If the product is already in the cart its quantity grows by one and the
    /// stored title, image and price are kept; the submitted ones are ignored.
    pub fn add(&mut self, item: NewCartItem) -> CartChange {
        if self.position(&item.id).is_some() {
            return self.increment(&item.id);
        }
        self.items.push(CartItem::from(item));
        CartChange::Added
    }

    /// Add one unit to the line for `id`. Unknown identifiers are ignored.
    pub fn increment(&mut self, id: &ProductId) -> CartChange {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return CartChange::Unchanged;
        };
        item.quantity = item.quantity.incremented();
        CartChange::Incremented {
            quantity: item.quantity,
        }
    }

    /// Take one unit from the line for `id`, removing the line when its last
    /// unit goes. Unknown identifiers are ignored.
    pub fn decrement(&mut self, id: &ProductId) -> CartChange {
        let Some(index) = self.position(id) else {
            return CartChange::Unchanged;
        };
        let Some(item) = self.items.get_mut(index) else {
            return CartChange::Unchanged;
        };
        if let Some(quantity) = item.quantity.decremented() {
            item.quantity = quantity;
            CartChange::Decremented { quantity }
        } else {
            self.items.remove(index);
            CartChange::Removed
        }
    }

    /// Look up the line for `id`.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Whether a line exists for `id`.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.position(id).is_some()
    }

    /// The lines, in cart order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Consume the cart and return its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
