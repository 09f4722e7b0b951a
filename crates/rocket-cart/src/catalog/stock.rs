//! Stock records and the stock/product lookup seam.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::LookupError;
use crate::ids::ProductId;

/// Available inventory for a product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockRecord {
    /// Product the record belongs to.
    pub id: ProductId,
    /// Units available.
    pub amount: i64,
}

impl StockRecord {
    /// Create a new stock record.
    pub fn new(id: impl Into<ProductId>, amount: i64) -> Self {
        Self {
            id: id.into(),
            amount,
        }
    }

    /// Check if `quantity` units can be held in a cart.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.amount >= quantity
    }
}

/// Read-only product and stock lookups.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch full product details.
    async fn product(&self, id: ProductId) -> Result<Product, LookupError>;

    /// Fetch the current stock record.
    async fn stock(&self, id: ProductId) -> Result<StockRecord, LookupError>;
}

#[async_trait]
impl<T: StockService + ?Sized> StockService for Arc<T> {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        (**self).product(id).await
    }

    async fn stock(&self, id: ProductId) -> Result<StockRecord, LookupError> {
        (**self).stock(id).await
    }
}

/// In-memory stock service (for development/testing).
#[derive(Debug, Default)]
pub struct InMemoryStockService {
    products: Mutex<HashMap<ProductId, Product>>,
    stock: Mutex<HashMap<ProductId, i64>>,
}

impl InMemoryStockService {
    /// Create an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product, keyed by its own id.
    pub fn with_product(self, product: Product) -> Self {
        let id = product.id;
        self.with_product_at(id, product)
    }

    /// Serve `product` for lookups of `id`, whatever the product's own id is.
    pub fn with_product_at(mut self, id: impl Into<ProductId>, product: Product) -> Self {
        if let Ok(products) = self.products.get_mut() {
            products.insert(id.into(), product);
        }
        self
    }

    /// Set the stock level for a product.
    pub fn with_stock(self, id: impl Into<ProductId>, amount: i64) -> Self {
        self.set_stock(id, amount);
        self
    }

    /// Change the stock level after construction.
    pub fn set_stock(&self, id: impl Into<ProductId>, amount: i64) {
        if let Ok(mut stock) = self.stock.lock() {
            stock.insert(id.into(), amount);
        }
    }
}

#[async_trait]
impl StockService for InMemoryStockService {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        let products = self
            .products
            .lock()
            .map_err(|_| LookupError::Unavailable("product table lock poisoned".to_string()))?;
        products.get(&id).cloned().ok_or(LookupError::NotFound(id))
    }

    async fn stock(&self, id: ProductId) -> Result<StockRecord, LookupError> {
        let stock = self
            .stock
            .lock()
            .map_err(|_| LookupError::Unavailable("stock table lock poisoned".to_string()))?;
        stock
            .get(&id)
            .map(|&amount| StockRecord::new(id, amount))
            .ok_or(LookupError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_fulfill() {
        let record = StockRecord::new(1, 3);
        assert!(record.can_fulfill(3));
        assert!(!record.can_fulfill(4));
        assert!(record.can_fulfill(0));
    }

    #[test]
    fn test_decode_stock_record() {
        let record: StockRecord = serde_json::from_str(r#"{"id": 1, "amount": 3}"#).unwrap();
        assert_eq!(record, StockRecord::new(1, 3));
    }

    #[tokio::test]
    async fn test_in_memory_lookups() {
        let service = InMemoryStockService::new()
            .with_product(Product::new(1, "Shoe", 100.0))
            .with_stock(1, 5);

        assert_eq!(service.product(ProductId::new(1)).await.unwrap().name, "Shoe");
        assert_eq!(service.stock(ProductId::new(1)).await.unwrap().amount, 5);

        service.set_stock(1, 2);
        assert_eq!(service.stock(ProductId::new(1)).await.unwrap().amount, 2);
    }

    #[tokio::test]
    async fn test_in_memory_missing_is_not_found() {
        let service = InMemoryStockService::new();
        assert!(matches!(
            service.stock(ProductId::new(9)).await,
            Err(LookupError::NotFound(id)) if id == ProductId::new(9)
        ));
        assert!(service.product(ProductId::new(9)).await.is_err());
    }

    #[tokio::test]
    async fn test_product_at_other_id() {
        let service =
            InMemoryStockService::new().with_product_at(1, Product::new(2, "Other", 10.0));
        let product = service.product(ProductId::new(1)).await.unwrap();
        assert_eq!(product.id, ProductId::new(2));
    }
}
