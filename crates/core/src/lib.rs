//! RocketShoes Core - Shared cart types.
//!
//! This crate provides the types shared by the RocketShoes components:
//! - `storefront` - Cart store, API client, persistence and catalog server
//! - `cli` - Command-line driver for cart sessions
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, cart line-items, stock records and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
