//! Scoped durable key-value storage for the RocketShoes cart.
//!
//! Provides a small [`Store`] seam over whatever medium keeps the cart
//! between sessions, plus the backends the workspace ships with:
//!
//! - [`MemoryStore`] - process-local, for tests and development
//! - [`FileStore`] - one file per key under a scope directory
//! - `SpinStore` - Spin's Key-Value Store (`wasm32` only)
//!
//! Values are raw bytes; encoding is the caller's concern.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_storage::{storage_key, FileStore, Store};
//!
//! let store = FileStore::open(".rocket", "default")?;
//! let key = storage_key!("@RocketShoes", "cart");
//!
//! store.set(&key, br#"[]"#)?;
//! let raw: Option<Vec<u8>> = store.get(&key)?;
//! ```

mod error;
mod file;
mod kv;
#[cfg(target_arch = "wasm32")]
mod spin;

pub use error::StorageError;
pub use file::FileStore;
pub use kv::{MemoryStore, Store};
#[cfg(target_arch = "wasm32")]
pub use spin::SpinStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileStore, MemoryStore, StorageError, Store};
}
