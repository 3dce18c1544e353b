//! Pineapple Cart Core - Cart types and state machine.
//!
//! This crate provides the types shared by every Pineapple Cart component:
//! - `store` - Cart store with persistence and change notification
//! - `cli` - Command-line tool for inspecting and editing a stored cart
//!
//! # Architecture
//!
//! The core crate contains only types and the pure cart state machine - no
//! I/O, no storage, no async runtime. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, quantities, line items and the [`Cart`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
