//! Product catalog module.
//!
//! Contains the product and stock types and the lookup seam.

mod product;
mod stock;

pub use product::Product;
pub use stock::{InMemoryStockService, StockRecord, StockService};
