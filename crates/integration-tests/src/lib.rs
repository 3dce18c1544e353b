//! Integration tests for Pineapple Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pineapple-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Cart operations through the store, end to end
//! - `persistence` - Restoring and saving carts through storage backends
//!
//! This crate also provides small fixtures shared by the test files.

use std::path::PathBuf;

use pineapple_cart_core::{NewCartItem, Price, ProductId};

/// Parse a product identifier.
///
/// # Panics
///
/// Panics if `id` is not a valid identifier.
#[must_use]
pub fn product_id(id: &str) -> ProductId {
    match ProductId::parse(id) {
        Ok(id) => id,
        Err(e) => panic!("invalid test product id {id:?}: {e}"),
    }
}

/// A product with the given id, title and price in cents.
#[must_use]
pub fn product(id: &str, title: &str, cents: u32) -> NewCartItem {
    NewCartItem::new(
        product_id(id),
        title,
        format!("https://cdn.example.com/{id}.png"),
        Price::from_cents(cents),
    )
}

/// A fresh directory path under the system temp dir. Not created.
#[must_use]
pub fn temp_dir(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4()))
}
