//! Cart and cart item types.

use std::collections::HashSet;

use crate::catalog::Product;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// One distinct product in the cart plus the selected quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product identifier.
    pub id: ProductId,
    /// Product name (denormalized for display).
    #[serde(alias = "title")]
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// Image URL.
    #[serde(default, alias = "image")]
    pub image_url: String,
    /// Quantity, always at least 1.
    pub amount: i64,
}

impl CartItem {
    /// Create a cart item for `product` with the given quantity.
    pub fn from_product(product: Product, amount: i64) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            amount,
        }
    }
}

/// An ordered shopping cart holding at most one item per product.
///
/// Carts are values: every transition returns a new cart and leaves the
/// receiver untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from a list of items.
    ///
    /// Entries with an amount below 1 are dropped. Of the remaining entries,
    /// later ones with an id already seen are dropped too, so the first valid
    /// occurrence of each product wins.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| item.amount >= 1)
            .filter(|item| seen.insert(item.id))
            .collect();
        Self { items }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Get the item for a product.
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Check if the cart holds an item for a product.
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Get number of unique items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get total item count (sum of amounts).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.amount).sum()
    }

    /// Return a cart with `item` appended.
    ///
    /// If the product is already present its entry is replaced in place.
    pub fn with_item(&self, item: CartItem) -> Cart {
        let mut items = self.items.clone();
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        Cart { items }
    }

    /// Return a cart where the product's amount is `amount`.
    pub fn with_amount(&self, id: ProductId, amount: i64) -> Cart {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == id {
                    CartItem {
                        amount,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Cart { items }
    }

    /// Return a cart without the product.
    pub fn without(&self, id: ProductId) -> Cart {
        let items = self.items.iter().filter(|i| i.id != id).cloned().collect();
        Cart { items }
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
