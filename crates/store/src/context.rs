//! Explicit context for UI consumers.
//!
//! Screens receive an [`AppContext`] by reference instead of reaching for a
//! global. The cart is attached once at startup with
//! [`AppContext::with_cart`]; a screen that asks for the cart from a context
//! that never had one attached is a wiring bug and fails immediately.

use crate::error::UsageError;
use crate::store::CartStore;

/// Shared services handed to every screen.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    cart: Option<CartStore>,
}

impl AppContext {
    /// Create a context with nothing attached.
    #[must_use]
    pub const fn new() -> Self {
        Self { cart: None }
    }

    /// Attach the cart store, replacing any previous one.
    #[must_use]
    pub fn with_cart(mut self, cart: CartStore) -> Self {
        self.cart = Some(cart);
        self
    }

    /// Get the cart store.
    ///
    /// # Errors
    ///
    /// Returns `UsageError::MissingProvider` if no cart store was attached.
    pub const fn try_cart(&self) -> Result<&CartStore, UsageError> {
        match &self.cart {
            Some(cart) => Ok(cart),
            None => Err(UsageError::MissingProvider),
        }
    }

    /// Get the cart store.
    ///
    /// # Panics
    ///
    /// Panics if no cart store was attached. Reaching for the cart outside
    /// its provider is a programming error, not a runtime condition.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        match self.try_cart() {
            Ok(cart) => cart,
            Err(e) => panic!("{e}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pineapple_cart_core::{Cart, NewCartItem, Price};

    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_try_cart_without_provider() {
        let context = AppContext::new();
        assert_eq!(context.try_cart().unwrap_err(), UsageError::MissingProvider);
    }

    #[test]
    #[should_panic(expected = "use_cart must be used within a cart provider")]
    fn test_cart_without_provider_panics() {
        let context = AppContext::default();
        let _ = context.cart();
    }

    #[tokio::test]
    async fn test_clones_share_the_store() {
        let store = CartStore::with_cart(MemoryStorage::new(), "k", Cart::new());
        let context = AppContext::new().with_cart(store);
        let screen = context.clone();

        screen
            .cart()
            .add_to_cart(NewCartItem::new("a".parse().unwrap(), "A", "", Price::ZERO));

        assert_eq!(context.cart().items().len(), 1);
    }
}
