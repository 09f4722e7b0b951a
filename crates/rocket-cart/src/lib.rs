//! Stock-validated shopping cart store for RocketShoes.
//!
//! This crate keeps the customer's cart and checks every quantity change
//! against live stock:
//!
//! - **Cart**: Immutable cart value, items and snapshot codecs
//! - **Catalog**: Products, stock records and the [`StockService`] seam
//! - **Store**: [`CartStore`], which applies add/remove/update and persists
//!   each accepted change
//! - **Notify**: User-facing messages and the [`Notifier`] sink
//!
//! With the `http` feature (on by default), [`HttpStockService`] talks to the
//! RocketShoes API through `rocket-data`.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_cart::prelude::*;
//! use rocket_storage::MemoryStore;
//!
//! let stock = InMemoryStockService::new()
//!     .with_product(Product::new(1, "Tênis de Caminhada", 179.9))
//!     .with_stock(1, 3);
//!
//! let mut store = CartStore::open(MemoryStore::new(), stock, NullNotifier);
//!
//! store.add_product(ProductId::new(1)).await;
//! store.add_product(ProductId::new(1)).await;
//! store.update_product_amount(UpdateProductAmount::new(1, 3)).await;
//!
//! assert_eq!(store.cart().item_count(), 3);
//! ```

pub mod error;
pub mod ids;
pub mod notify;
pub mod outcome;

pub mod cart;
pub mod catalog;
#[cfg(feature = "http")]
pub mod http;
pub mod store;

pub use error::{CartError, CodecError, LookupError};
pub use ids::ProductId;
pub use notify::{Messages, Notifier, NullNotifier, RecordingNotifier};
pub use outcome::CartOutcome;

pub use cart::{Cart, CartCodec, CartItem, JsonCodec};
pub use catalog::{InMemoryStockService, Product, StockRecord, StockService};
#[cfg(feature = "http")]
pub use http::HttpStockService;
pub use store::{default_key, CartStore, UpdateProductAmount, STORAGE_PREFIX};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CartError, CodecError, LookupError};
    pub use crate::ids::ProductId;
    pub use crate::notify::{Messages, Notifier, NullNotifier};
    pub use crate::outcome::CartOutcome;

    // Cart
    pub use crate::cart::{Cart, CartCodec, CartItem, JsonCodec};

    // Catalog
    pub use crate::catalog::{InMemoryStockService, Product, StockRecord, StockService};
    #[cfg(feature = "http")]
    pub use crate::http::HttpStockService;

    // Store
    pub use crate::store::{CartStore, UpdateProductAmount};
}
