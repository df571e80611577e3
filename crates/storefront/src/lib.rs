//! RocketShoes Storefront library.
//!
//! A stock-validated shopping cart for the storefront front-end: it tracks
//! which products the shopper selected, checks quantities against the stock
//! API and keeps the cart across reloads.
//!
//! # Architecture
//!
//! - [`cart::CartStore`] owns the cart and mediates every mutation
//! - [`api::StoreApi`] reads stock and product records (HTTP via [`api::ApiClient`])
//! - [`storage::CartStorage`] is the persistence slot (memory or file backed)
//! - [`notify::Notifier`] carries user-facing messages
//! - [`catalog`] serves the stock/product endpoints from a JSON fixture
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_storefront::{ApiClient, CartStore, FileStorage, TracingNotifier};
//!
//! let api = ApiClient::new(&config.api)?;
//! let store = CartStore::load(api, FileStorage::new(&config.data_dir), TracingNotifier);
//!
//! store.add_product(ProductId::new(1)).await;
//! println!("{} items", store.summary().item_count);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod state;
pub mod storage;

pub use api::{ApiClient, ApiError, StoreApi};
pub use cart::{CartSnapshot, CartStore, CartSummary};
pub use error::{CartError, CartOperation, Outcome};
pub use notify::{CollectingNotifier, Notification, Notifier, TracingNotifier};
pub use storage::{CART_STORAGE_KEY, CartStorage, FileStorage, MemoryStorage, StorageError};
