//! The cart store: owns the cart, validates changes against stock and
//! mirrors every change to durable storage.

use rocket_storage::{storage_key, Store};
use tracing::{debug, instrument, warn};

use crate::cart::{Cart, CartCodec, CartItem, JsonCodec};
use crate::catalog::StockService;
use crate::error::{CartError, LookupError};
use crate::ids::ProductId;
use crate::notify::{Messages, Notifier};
use crate::outcome::CartOutcome;

/// Namespace for keys written by this crate.
pub const STORAGE_PREFIX: &str = "@RocketShoes";

/// The key the cart snapshot is stored under: `@RocketShoes:cart`.
pub fn default_key() -> String {
    storage_key!(STORAGE_PREFIX, "cart")
}

/// Request to set an item's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Requested absolute quantity. Any value is accepted.
    pub amount: i64,
}

impl UpdateProductAmount {
    pub fn new(product_id: impl Into<ProductId>, amount: i64) -> Self {
        Self {
            product_id: product_id.into(),
            amount,
        }
    }
}

/// Stateful cart store.
///
/// Operations borrow the store mutably for their whole duration, including
/// the stock lookup, so operations on one store never interleave. Failures
/// never surface as `Err`: they are reported through the notifier and the
/// returned [`CartOutcome`], and the cart is left as it was.
pub struct CartStore<S, P, N> {
    store: S,
    stock: P,
    notifier: N,
    codec: Box<dyn CartCodec>,
    messages: Messages,
    key: String,
    cart: Cart,
}

impl<S, P, N> CartStore<S, P, N>
where
    S: Store,
    P: StockService,
    N: Notifier,
{
    /// Open a store, reading the last snapshot from `store`.
    ///
    /// A missing snapshot gives an empty cart. So does an unreadable one,
    /// with a warning logged.
    pub fn open(store: S, stock: P, notifier: N) -> Self {
        let codec: Box<dyn CartCodec> = Box::new(JsonCodec);
        let key = default_key();
        let cart = load_snapshot(&store, codec.as_ref(), &key);
        Self {
            store,
            stock,
            notifier,
            codec,
            messages: Messages::default(),
            key,
            cart,
        }
    }

    /// Use a different snapshot codec. The snapshot is read again with it.
    pub fn with_codec(mut self, codec: impl CartCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self.cart = load_snapshot(&self.store, self.codec.as_ref(), &self.key);
        self
    }

    /// Store the snapshot under a different key. The snapshot is read again
    /// from it.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self.cart = load_snapshot(&self.store, self.codec.as_ref(), &self.key);
        self
    }

    /// Use different notification texts.
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Consume the store, keeping the cart.
    pub fn into_cart(self) -> Cart {
        self.cart
    }

    /// The durable store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The stock service.
    pub fn stock_service(&self) -> &P {
        &self.stock
    }

    /// The notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The key the snapshot is written under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart is looked up and appended with amount
    /// 1. A product already in the cart is incremented if stock allows.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> CartOutcome {
        match self.try_add_product(product_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "add product failed");
                self.notifier.notify_error(&self.messages.add_failed);
                CartOutcome::Failed
            }
        }
    }

    async fn try_add_product(&mut self, product_id: ProductId) -> Result<CartOutcome, LookupError> {
        let Some(current) = self.cart.get(product_id).map(|item| item.amount) else {
            let product = self.stock.product(product_id).await?;
            if product.id != product_id {
                debug!(returned = %product.id, "product lookup returned another id");
                return Ok(CartOutcome::Ignored);
            }

            let next = self.cart.with_item(CartItem::from_product(product, 1));
            self.replace(next);
            self.notifier.notify(&self.messages.added);
            return Ok(CartOutcome::Added);
        };

        let stock = self.stock.stock(product_id).await?;
        if stock.amount > current {
            let next = self.cart.with_amount(product_id, current + 1);
            self.replace(next);
            Ok(CartOutcome::Incremented)
        } else {
            debug!(stock = stock.amount, current, "increment exceeds stock");
            self.notifier.notify_error(&self.messages.out_of_stock);
            Ok(CartOutcome::StockExceeded)
        }
    }

    /// Remove a product from the cart.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) -> CartOutcome {
        if !self.cart.contains(product_id) {
            debug!("product not in cart");
            self.notifier.notify_error(&self.messages.remove_failed);
            return CartOutcome::NotFound;
        }

        let next = self.cart.without(product_id);
        self.replace(next);
        CartOutcome::Removed
    }

    /// Set a product's quantity, checked against stock.
    ///
    /// Amounts below 1 that pass the stock check leave the cart unchanged
    /// without any notification; they do not remove the item.
    #[instrument(skip_all, fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&mut self, request: UpdateProductAmount) -> CartOutcome {
        let UpdateProductAmount { product_id, amount } = request;

        if !self.cart.contains(product_id) {
            debug!("product not in cart");
            self.notifier.notify_error(&self.messages.update_failed);
            return CartOutcome::NotFound;
        }

        let stock = match self.stock.stock(product_id).await {
            Ok(stock) => stock,
            Err(e) => {
                warn!(error = %e, "stock lookup failed");
                self.notifier.notify_error(&self.messages.update_failed);
                return CartOutcome::Failed;
            }
        };

        if !stock.can_fulfill(amount) {
            debug!(stock = stock.amount, "requested amount exceeds stock");
            self.notifier.notify_error(&self.messages.out_of_stock);
            return CartOutcome::StockExceeded;
        }

        if amount < 1 {
            debug!("amount below 1 ignored");
            return CartOutcome::Ignored;
        }

        let next = self.cart.with_amount(product_id, amount);
        self.replace(next);
        CartOutcome::Updated
    }

    /// Swap in a new cart and mirror it to storage.
    ///
    /// Write failures are logged; the in-memory cart keeps the new value.
    fn replace(&mut self, next: Cart) {
        self.cart = next;
        if let Err(e) = self.persist() {
            warn!(key = %self.key, error = %e, "failed to persist cart");
        }
    }

    fn persist(&self) -> Result<(), CartError> {
        let bytes = self.codec.encode(&self.cart)?;
        self.store.set(&self.key, &bytes)?;
        debug!(key = %self.key, items = self.cart.len(), "cart persisted");
        Ok(())
    }
}

fn load_snapshot<S: Store>(store: &S, codec: &dyn CartCodec, key: &str) -> Cart {
    match store.get(key) {
        Ok(Some(bytes)) => match codec.decode(&bytes) {
            Ok(cart) => {
                debug!(key, items = cart.len(), "cart snapshot loaded");
                cart
            }
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable cart snapshot");
                Cart::new()
            }
        },
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(key, error = %e, "failed to read cart snapshot");
            Cart::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::catalog::{InMemoryStockService, Product};
    use crate::error::CodecError;
    use crate::notify::RecordingNotifier;
    use rocket_storage::{MemoryStore, StorageError};

    type TestStore = CartStore<MemoryStore, InMemoryStockService, RecordingNotifier>;

    fn shoe(id: u64) -> Product {
        Product::new(id, format!("Shoe {}", id), 100.0)
    }

    fn open_with(store: MemoryStore, stock: InMemoryStockService) -> TestStore {
        CartStore::open(store, stock, RecordingNotifier::new())
    }

    fn stored_cart(store: &TestStore) -> Cart {
        let raw = store.store().get(store.key()).unwrap().unwrap();
        JsonCodec.decode(&raw).unwrap()
    }

    #[test]
    fn test_default_key() {
        assert_eq!(default_key(), "@RocketShoes:cart");
    }

    #[test]
    fn test_open_empty_store() {
        let store = open_with(MemoryStore::new(), InMemoryStockService::new());
        assert!(store.cart().is_empty());
        assert_eq!(store.store().get(store.key()).unwrap(), None);
    }

    #[test]
    fn test_open_loads_snapshot() {
        let raw = br#"[{"id":3,"name":"Boot","price":50,"imageUrl":"","amount":2}]"#;
        let store = open_with(
            MemoryStore::with_entry(default_key(), raw.to_vec()),
            InMemoryStockService::new(),
        );
        assert_eq!(store.cart().get(ProductId::new(3)).unwrap().amount, 2);
    }

    #[test]
    fn test_open_corrupted_snapshot_is_empty() {
        let store = open_with(
            MemoryStore::with_entry(default_key(), "not json"),
            InMemoryStockService::new(),
        );
        assert!(store.cart().is_empty());
        assert!(store.notifier().is_empty());
    }

    #[tokio::test]
    async fn test_add_new_product() {
        let mut store = open_with(
            MemoryStore::new(),
            InMemoryStockService::new().with_product(shoe(1)).with_stock(1, 5),
        );

        assert_eq!(store.add_product(ProductId::new(1)).await, CartOutcome::Added);
        assert_eq!(store.cart().get(ProductId::new(1)).unwrap().amount, 1);
        assert_eq!(store.notifier().infos(), vec!["Produto Adicionado"]);
        assert_eq!(&stored_cart(&store), store.cart());
    }

    #[tokio::test]
    async fn test_add_lookup_failure_notifies() {
        let mut store = open_with(MemoryStore::new(), InMemoryStockService::new());

        assert_eq!(store.add_product(ProductId::new(1)).await, CartOutcome::Failed);
        assert!(store.cart().is_empty());
        assert_eq!(store.notifier().errors(), vec!["Erro na adição do produto"]);
        assert_eq!(store.store().get(store.key()).unwrap(), None);
    }

    /// JSON behind a version line.
    struct VersionedCodec;

    const VERSION_LINE: &[u8] = b"cart/v2\n";

    impl CartCodec for VersionedCodec {
        fn encode(&self, cart: &Cart) -> Result<Vec<u8>, CodecError> {
            let mut bytes = VERSION_LINE.to_vec();
            bytes.extend(JsonCodec.encode(cart)?);
            Ok(bytes)
        }

        fn decode(&self, bytes: &[u8]) -> Result<Cart, CodecError> {
            match bytes.strip_prefix(VERSION_LINE) {
                Some(json) => JsonCodec.decode(json),
                None => Err(CodecError::Decode("missing version line".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_custom_codec_persists_and_reloads() {
        let backing = Arc::new(MemoryStore::new());
        let mut store = CartStore::open(
            Arc::clone(&backing),
            InMemoryStockService::new().with_product(shoe(4)).with_stock(4, 3),
            RecordingNotifier::new(),
        )
        .with_codec(VersionedCodec);

        store.add_product(ProductId::new(4)).await;
        store.add_product(ProductId::new(4)).await;

        let raw = backing.get(&default_key()).unwrap().unwrap();
        assert!(raw.starts_with(VERSION_LINE));

        let reopened = CartStore::open(
            Arc::clone(&backing),
            InMemoryStockService::new(),
            RecordingNotifier::new(),
        )
        .with_codec(VersionedCodec);
        assert_eq!(reopened.cart(), store.cart());
        assert_eq!(reopened.cart().get(ProductId::new(4)).unwrap().amount, 2);

        // The default codec cannot read this snapshot
        let plain = CartStore::open(backing, InMemoryStockService::new(), RecordingNotifier::new());
        assert!(plain.cart().is_empty());
    }

    #[tokio::test]
    async fn test_custom_messages() {
        let mut store = open_with(
            MemoryStore::new(),
            InMemoryStockService::new().with_product(shoe(1)),
        )
        .with_messages(Messages {
            added: "item added".to_string(),
            ..Messages::default()
        });

        store.add_product(ProductId::new(1)).await;
        assert_eq!(store.notifier().infos(), vec!["item added"]);
    }

    #[tokio::test]
    async fn test_with_key_reads_other_snapshot() {
        let raw = br#"[{"id":5,"name":"Sandal","price":20,"imageUrl":"","amount":1}]"#;
        let mut store = open_with(
            MemoryStore::with_entry("@RocketShoes:cart:alice", raw.to_vec()),
            InMemoryStockService::new(),
        )
        .with_key("@RocketShoes:cart:alice");

        assert!(store.cart().contains(ProductId::new(5)));
        assert_eq!(store.remove_product(ProductId::new(5)), CartOutcome::Removed);
        assert_eq!(
            store.store().get("@RocketShoes:cart:alice").unwrap(),
            Some(b"[]".to_vec())
        );
        assert_eq!(store.store().get(&default_key()).unwrap(), None);
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl Store for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::StoreError("read-only".to_string()))
        }

        fn delete(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn keys(&self) -> Result<Vec<String>, StorageError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_write_failure_is_not_reported() {
        let mut store = CartStore::open(
            ReadOnlyStore,
            InMemoryStockService::new().with_product(shoe(1)),
            RecordingNotifier::new(),
        );

        assert_eq!(store.add_product(ProductId::new(1)).await, CartOutcome::Added);
        assert_eq!(store.cart().len(), 1);
        assert!(store.notifier().errors().is_empty());
    }

    #[tokio::test]
    async fn test_into_cart() {
        let mut store = open_with(
            MemoryStore::new(),
            InMemoryStockService::new().with_product(shoe(2)),
        );
        store.add_product(ProductId::new(2)).await;

        let cart = store.into_cart();
        assert!(cart.contains(ProductId::new(2)));
    }
}
