//! Cart line items.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, Quantity};

/// A product as submitted by the UI when the shopper taps "add to cart".
///
/// Carries everything a line item needs except the quantity, which the cart
/// decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
}

impl NewCartItem {
    /// Create a new item.
    #[must_use]
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// A line in the cart.
///
/// Field names match the persisted snapshot format:
/// `id`, `title`, `image_url`, `price`, `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
    pub quantity: Quantity,
}

impl CartItem {
    /// Create a line item holding `quantity` units of `item`.
    #[must_use]
    pub fn with_quantity(item: NewCartItem, quantity: Quantity) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            quantity,
        }
    }
}

impl From<NewCartItem> for CartItem {
    /// A freshly added line holds a single unit.
    fn from(item: NewCartItem) -> Self {
        Self::with_quantity(item, Quantity::ONE)
    }
}
