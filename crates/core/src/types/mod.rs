//! Core types for the cart.
//!
//! This module provides type-safe wrappers for the cart's domain concepts
//! and the cart state machine itself.

pub mod cart;
pub mod id;
pub mod item;
pub mod price;
pub mod quantity;

pub use cart::{Cart, CartChange, CartError};
pub use id::{ProductId, ProductIdError};
pub use item::{CartItem, NewCartItem};
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
