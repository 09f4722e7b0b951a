//! End-to-end behavior of `CartStore` against in-memory collaborators.

use std::sync::Arc;

use rocket_cart::prelude::*;
use rocket_cart::{default_key, RecordingNotifier};
use rocket_storage::{FileStore, MemoryStore, Store};
use serde_json::json;

const OUT_OF_STOCK: &str = "Quantidade solicitada fora de estoque";

type TestStore<S = MemoryStore> = CartStore<S, InMemoryStockService, RecordingNotifier>;

fn shoe(id: u64) -> Product {
    Product::new(id, format!("Shoe {}", id), 100.0)
}

fn seeded(items: serde_json::Value) -> MemoryStore {
    MemoryStore::with_entry(default_key(), items.to_string())
}

fn open<S: Store>(store: S, stock: InMemoryStockService) -> TestStore<S> {
    CartStore::open(store, stock, RecordingNotifier::new())
}

fn raw_snapshot<S: Store>(store: &TestStore<S>) -> Option<Vec<u8>> {
    store.store().get(&default_key()).unwrap()
}

fn assert_mirrored<S: Store>(store: &TestStore<S>) {
    let raw = raw_snapshot(store).expect("snapshot written");
    let stored: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(stored, serde_json::to_value(store.cart()).unwrap());
}

fn amount_of<S: Store>(store: &TestStore<S>, id: u64) -> Option<i64> {
    store.cart().get(ProductId::new(id)).map(|i| i.amount)
}

#[tokio::test]
async fn test_add_to_empty_cart() {
    let stock = InMemoryStockService::new()
        .with_product(Product::new(1, "Shoe", 100.0))
        .with_stock(1, 5);
    let mut store = open(MemoryStore::new(), stock);

    let outcome = store.add_product(ProductId::new(1)).await;

    assert_eq!(outcome, CartOutcome::Added);
    assert_eq!(
        serde_json::to_value(store.cart()).unwrap(),
        json!([{"id": 1, "name": "Shoe", "price": 100.0, "imageUrl": "", "amount": 1}])
    );
    assert_mirrored(&store);
    assert_eq!(store.notifier().infos(), vec!["Produto Adicionado"]);
    assert!(store.notifier().errors().is_empty());
}

#[tokio::test]
async fn test_add_appends_and_leaves_others_untouched() {
    let stored = seeded(json!([
        {"id": 2, "name": "Boot", "price": 80.5, "imageUrl": "b.jpg", "amount": 2}
    ]));
    let mut store = open(stored, InMemoryStockService::new().with_product(shoe(1)));
    let before = store.cart().get(ProductId::new(2)).cloned();

    assert_eq!(store.add_product(ProductId::new(1)).await, CartOutcome::Added);

    let ids: Vec<u64> = store.cart().items().iter().map(|i| i.id.get()).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(store.cart().get(ProductId::new(2)).cloned(), before);
    assert_mirrored(&store);
}

#[tokio::test]
async fn test_add_increments_within_stock() {
    let stored = seeded(json!([
        {"id": 1, "name": "Shoe 1", "price": 100.0, "imageUrl": "", "amount": 1}
    ]));
    let mut store = open(stored, InMemoryStockService::new().with_stock(1, 2));

    assert_eq!(
        store.add_product(ProductId::new(1)).await,
        CartOutcome::Incremented
    );
    assert_eq!(amount_of(&store, 1), Some(2));
    assert_mirrored(&store);
    assert!(store.notifier().is_empty());

    assert_eq!(
        store.add_product(ProductId::new(1)).await,
        CartOutcome::StockExceeded
    );
    assert_eq!(amount_of(&store, 1), Some(2));
    assert_eq!(store.notifier().errors(), vec![OUT_OF_STOCK]);
}

#[tokio::test]
async fn test_add_at_stock_limit_is_rejected() {
    let stored = seeded(json!([
        {"id": 1, "name": "Shoe 1", "price": 100.0, "imageUrl": "", "amount": 3}
    ]));
    let mut store = open(stored, InMemoryStockService::new().with_stock(1, 3));
    let before = store.cart().clone();
    let raw_before = raw_snapshot(&store);

    let outcome = store.add_product(ProductId::new(1)).await;

    assert_eq!(outcome, CartOutcome::StockExceeded);
    assert_eq!(store.cart(), &before);
    assert_eq!(raw_snapshot(&store), raw_before);
    assert_eq!(store.notifier().errors(), vec![OUT_OF_STOCK]);
}

#[tokio::test]
async fn test_add_mismatched_product_is_ignored() {
    let stock = InMemoryStockService::new().with_product_at(1, shoe(7));
    let mut store = open(MemoryStore::new(), stock);

    let outcome = store.add_product(ProductId::new(1)).await;

    assert_eq!(outcome, CartOutcome::Ignored);
    assert!(store.cart().is_empty());
    assert!(store.notifier().is_empty());
    assert_eq!(raw_snapshot(&store), None);
}

#[tokio::test]
async fn test_add_stock_lookup_failure() {
    let stored = seeded(json!([
        {"id": 1, "name": "Shoe 1", "price": 100.0, "imageUrl": "", "amount": 1}
    ]));
    // No stock record for product 1
    let mut store = open(stored, InMemoryStockService::new());

    assert_eq!(store.add_product(ProductId::new(1)).await, CartOutcome::Failed);
    assert_eq!(amount_of(&store, 1), Some(1));
    assert_eq!(store.notifier().errors(), vec!["Erro na adição do produto"]);
}

#[tokio::test]
async fn test_remove_present_item() {
    let stored = seeded(json!([
        {"id": 1, "name": "Shoe 1", "price": 100.0, "imageUrl": "", "amount": 1},
        {"id": 2, "name": "Shoe 2", "price": 100.0, "imageUrl": "", "amount": 4}
    ]));
    let mut store = open(stored, InMemoryStockService::new());

    assert_eq!(store.remove_product(ProductId::new(1)), CartOutcome::Removed);

    assert_eq!(store.cart().len(), 1);
    assert!(!store.cart().contains(ProductId::new(1)));
    assert_eq!(amount_of(&store, 2), Some(4));
    assert_mirrored(&store);
    assert!(store.notifier().is_empty());
}

#[tokio::test]
async fn test_remove_absent_item() {
    let stored = seeded(json!([
        {"id": 2, "name": "Shoe 2", "price": 100.0, "imageUrl": "", "amount": 4}
    ]));
    let mut store = open(stored, InMemoryStockService::new());
    let before = store.cart().clone();
    let raw_before = raw_snapshot(&store);

    assert_eq!(store.remove_product(ProductId::new(1)), CartOutcome::NotFound);

    assert_eq!(store.cart(), &before);
    assert_eq!(raw_snapshot(&store), raw_before);
    assert_eq!(store.notifier().errors(), vec!["Erro na remoção do produto"]);
}

#[tokio::test]
async fn test_update_within_stock() {
    let stored = seeded(json!([
        {"id": 1, "name": "Shoe 1", "price": 100.0, "imageUrl": "", "amount": 1},
        {"id": 2, "name": "Shoe 2", "price": 100.0, "imageUrl": "", "amount": 2}
    ]));
    let mut store = open(stored, InMemoryStockService::new().with_stock(2, 5));

    let outcome = store
        .update_product_amount(UpdateProductAmount::new(2, 5))
        .await;

    assert_eq!(outcome, CartOutcome::Updated);
    assert_eq!(amount_of(&store, 2), Some(5));
    assert_eq!(amount_of(&store, 1), Some(1));
    assert_mirrored(&store);
    assert!(store.notifier().is_empty());
}

#[tokio::test]
async fn test_update_above_stock() {
    let stored = seeded(json!([
        {"id": 2, "name": "Shoe 2", "price": 100.0, "imageUrl": "", "amount": 2}
    ]));
    let mut store = open(stored, InMemoryStockService::new().with_stock(2, 5));

    let outcome = store
        .update_product_amount(UpdateProductAmount::new(2, 6))
        .await;

    assert_eq!(outcome, CartOutcome::StockExceeded);
    assert_eq!(amount_of(&store, 2), Some(2));
    assert_eq!(store.notifier().errors(), vec![OUT_OF_STOCK]);
}

#[tokio::test]
async fn test_update_to_zero_is_silent_noop() {
    let stored = seeded(json!([
        {"id": 2, "name": "Shoe 2", "price": 100.0, "imageUrl": "", "amount": 2}
    ]));
    let mut store = open(stored, InMemoryStockService::new().with_stock(2, 10));
    let before = store.cart().clone();

    for amount in [0, -3] {
        let outcome = store
            .update_product_amount(UpdateProductAmount::new(2, amount))
            .await;
        assert_eq!(outcome, CartOutcome::Ignored);
    }

    assert_eq!(store.cart(), &before);
    assert!(store.notifier().is_empty());
}

#[tokio::test]
async fn test_update_absent_item() {
    let mut store = open(MemoryStore::new(), InMemoryStockService::new().with_stock(1, 10));

    let outcome = store
        .update_product_amount(UpdateProductAmount::new(1, 2))
        .await;

    assert_eq!(outcome, CartOutcome::NotFound);
    assert!(store.cart().is_empty());
    assert_eq!(
        store.notifier().errors(),
        vec!["Erro na alteração de quantidade do produto"]
    );
}

#[tokio::test]
async fn test_update_stock_lookup_failure() {
    let stored = seeded(json!([
        {"id": 2, "name": "Shoe 2", "price": 100.0, "imageUrl": "", "amount": 2}
    ]));
    let mut store = open(stored, InMemoryStockService::new());

    let outcome = store
        .update_product_amount(UpdateProductAmount::new(2, 1))
        .await;

    assert_eq!(outcome, CartOutcome::Failed);
    assert_eq!(amount_of(&store, 2), Some(2));
    assert_eq!(
        store.notifier().errors(),
        vec!["Erro na alteração de quantidade do produto"]
    );
}

#[tokio::test]
async fn test_ids_stay_unique_across_operations() {
    let stock = InMemoryStockService::new()
        .with_product(shoe(1))
        .with_product(shoe(2))
        .with_stock(1, 3)
        .with_stock(2, 3);
    let mut store = open(MemoryStore::new(), stock);

    for id in [1, 2, 1, 1, 2, 1, 2, 2] {
        store.add_product(ProductId::new(id)).await;
    }
    store
        .update_product_amount(UpdateProductAmount::new(1, 2))
        .await;
    store.remove_product(ProductId::new(2));
    store.add_product(ProductId::new(2)).await;

    let mut ids: Vec<u64> = store.cart().items().iter().map(|i| i.id.get()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), store.cart().len());
    assert_eq!(amount_of(&store, 1), Some(2));
    assert_eq!(amount_of(&store, 2), Some(1));
    assert_mirrored(&store);
}

#[tokio::test]
async fn test_reopen_restores_cart() {
    let shared = Arc::new(MemoryStore::new());
    let stock = Arc::new(InMemoryStockService::new().with_product(shoe(4)).with_stock(4, 9));

    let mut first = CartStore::open(Arc::clone(&shared), Arc::clone(&stock), NullNotifier);
    first.add_product(ProductId::new(4)).await;
    first.add_product(ProductId::new(4)).await;
    let expected = first.into_cart();

    let second = CartStore::open(Arc::clone(&shared), stock, NullNotifier);
    assert_eq!(second.cart(), &expected);
    assert_eq!(second.cart().item_count(), 2);
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let stock = InMemoryStockService::new().with_product(shoe(1)).with_stock(1, 2);

    {
        let files = FileStore::open(dir.path(), "default").unwrap();
        let mut store = open(files, stock);
        assert_eq!(store.add_product(ProductId::new(1)).await, CartOutcome::Added);
    }

    let files = FileStore::open(dir.path(), "default").unwrap();
    let store = open(files, InMemoryStockService::new());
    assert_eq!(amount_of(&store, 1), Some(1));

    let other = FileStore::open(dir.path(), "other").unwrap();
    assert!(open(other, InMemoryStockService::new()).cart().is_empty());
}

#[test]
fn test_duplicate_snapshot_entries_are_normalized() {
    let stored = seeded(json!([
        {"id": 1, "name": "Shoe 1", "price": 100.0, "imageUrl": "", "amount": 2},
        {"id": 1, "name": "Shoe 1", "price": 100.0, "imageUrl": "", "amount": 7}
    ]));
    let store = open(stored, InMemoryStockService::new());

    assert_eq!(store.cart().len(), 1);
    assert_eq!(amount_of(&store, 1), Some(2));
}

#[tokio::test]
async fn test_snapshot_entries_below_one_are_dropped() {
    let stored = seeded(json!([
        {"id": 1, "name": "Shoe 1", "price": 100.0, "imageUrl": "", "amount": 0},
        {"id": 2, "name": "Shoe 2", "price": 100.0, "imageUrl": "", "amount": -4},
        {"id": 3, "name": "Shoe 3", "price": 100.0, "imageUrl": "", "amount": 2}
    ]));
    let mut store = open(stored, InMemoryStockService::new().with_product(shoe(1)).with_stock(1, 5));

    assert_eq!(store.cart().len(), 1);
    assert_eq!(amount_of(&store, 3), Some(2));
    assert_eq!(store.cart().item_count(), 2);

    // A dropped entry comes back as a fresh add, not an increment from 0
    assert_eq!(store.add_product(ProductId::new(1)).await, CartOutcome::Added);
    assert_eq!(amount_of(&store, 1), Some(1));
    assert_mirrored(&store);
}

#[test]
fn test_corrupted_snapshot_opens_empty() {
    let stored = MemoryStore::with_entry(default_key(), "[{\"id\": 1,");
    let store = open(stored, InMemoryStockService::new());

    assert!(store.cart().is_empty());
    assert!(store.notifier().is_empty());
}
