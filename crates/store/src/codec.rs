//! Snapshot blob format.
//!
//! A persisted cart is a JSON array of line items:
//!
//! ```json
//! [{"id":"a","title":"Shirt","image_url":"https://...","price":10.0,"quantity":2}]
//! ```

use pineapple_cart_core::{Cart, CartItem};

use crate::error::LoadError;

/// Serialize a cart into its blob form.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(cart.items())
}

/// Parse a blob back into a cart.
///
/// # Errors
///
/// Returns `LoadError::Decode` if the blob is not a list of valid items, and
/// `LoadError::Invalid` if two items share an identifier.
pub fn decode(blob: &str) -> Result<Cart, LoadError> {
    let items: Vec<CartItem> = serde_json::from_str(blob)?;
    Ok(Cart::from_items(items)?)
}
