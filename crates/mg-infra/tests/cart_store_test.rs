//! SQLite cart store, alone and wrapped in the inline payload transform.

use std::sync::Arc;

use mg_core::cart::CartLedger;
use mg_core::ports::{CartStorePort, ClockPort};
use mg_core::{find_package, CartLineItem, Finish, LineItemId, Money};
use mg_infra::{
    init_db_pool, CartStateRowMapper, DieselCartStateRepository, DieselSqliteExecutor,
    FsThumbnailCache, InlinePayloadStrippingStore, CART_STORAGE_KEY,
};
use tempfile::TempDir;

struct FixedClock;

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        1_704_067_200_000
    }
}

fn repository(database_url: &str) -> DieselCartStateRepository<DieselSqliteExecutor> {
    let pool = init_db_pool(database_url).expect("Failed to create test DB pool");
    DieselCartStateRepository::new(
        DieselSqliteExecutor::new(pool),
        CartStateRowMapper::new(CART_STORAGE_KEY, Arc::new(FixedClock)),
    )
}

fn package_item(previews: Vec<String>) -> CartLineItem {
    CartLineItem::package(
        LineItemId::from("pkg-9"),
        find_package("9").unwrap(),
        Finish::Matte,
        (0..9).map(|i| format!("https://cdn.example.com/{i}.jpg")).collect(),
        previews,
    )
}

#[tokio::test]
async fn test_empty_database_loads_nothing() {
    let repo = repository(":memory:");
    assert!(repo.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_overwrites_previous_cart() {
    let repo = repository(":memory:");
    let mut ledger = CartLedger::new();
    ledger.add_item(CartLineItem::simple("a".into(), "A", Money::gbp(5, 0)));
    repo.save(&ledger.to_stored()).await.unwrap();

    ledger.add_item(package_item(Vec::new()));
    repo.save(&ledger.to_stored()).await.unwrap();

    let loaded = repo.load().await.unwrap().unwrap();
    assert_eq!(loaded.items.len(), 2);
    assert_eq!(loaded.total_amount, Money::gbp(28, 0));

    let restored = CartLedger::from_stored(loaded);
    let details = restored.items()[1].package_details().unwrap();
    assert_eq!(details.package_id, "9");
    assert_eq!(details.finish, Finish::Matte);
    assert_eq!(restored.items()[1].images.len(), 9);
}

#[tokio::test]
async fn test_cart_survives_reopening_the_database_file() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cart.db");
    let db_url = db_path.to_str().unwrap();
    let cache_dir = dir.path().join("thumbnails");
    let preview = format!("data:image/webp;base64,{}", "Q".repeat(4096));

    {
        let store = InlinePayloadStrippingStore::new(
            repository(db_url),
            Arc::new(FsThumbnailCache::new(cache_dir.clone())),
            1024,
        );
        let mut ledger = CartLedger::new();
        ledger.add_item(package_item(vec![preview.clone()]));
        store.save(&ledger.to_stored()).await.unwrap();
    }

    // the raw row holds only the cache reference
    let raw = repository(db_url).load().await.unwrap().unwrap();
    assert_eq!(raw.items[0].previews, vec!["local-cache://pkg-9:preview-0".to_string()]);

    let store = InlinePayloadStrippingStore::new(
        repository(db_url),
        Arc::new(FsThumbnailCache::new(cache_dir.clone())),
        1024,
    );
    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded.items[0].previews, vec![preview]);

    std::fs::remove_dir_all(&cache_dir).unwrap();
    let loaded = store.load().await.unwrap().unwrap();
    assert!(loaded.items[0].previews.is_empty());
    assert_eq!(loaded.items[0].images.len(), 9);
}
