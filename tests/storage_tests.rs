//! Storage backend tests
//!
//! Tests for SeaOrmStorage using temporary SQLite databases.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::sync::Once;
use tempfile::TempDir;
use uuid::Uuid;

use afflink::config::init_config;
use afflink::errors::AfflinkError;
use afflink::storage::backend::SeaOrmStorage;
use afflink::storage::{Campaign, Link, Marketplace, Offer, Product};

// 确保 config 只初始化一次
static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

/// 创建临时 SQLite 数据库的存储实例
async fn create_temp_storage() -> (SeaOrmStorage, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");

    (storage, temp_dir)
}

fn create_test_product(marketplace: Marketplace) -> Product {
    let id = Uuid::new_v4().to_string();
    Product {
        source_url: format!("https://{}.sg/item/{}", marketplace, id),
        image_url: format!("https://img.{}.sg/{}.jpg", marketplace, id),
        id,
        title: "Test Product".to_string(),
        marketplace,
        created_at: Utc::now(),
    }
}

fn create_test_campaign(owner: &str, utm: &str) -> Campaign {
    Campaign {
        id: Uuid::new_v4().to_string(),
        owner_user_id: owner.to_string(),
        name: format!("Campaign {}", utm),
        start_at: Utc::now() - Duration::days(1),
        end_at: Utc::now() + Duration::days(30),
        utm_campaign: utm.to_string(),
        created_at: Utc::now(),
    }
}

fn create_test_link(campaign: &Campaign, product: &Product, code: &str) -> Link {
    Link {
        id: Uuid::new_v4().to_string(),
        campaign_id: campaign.id.clone(),
        product_id: product.id.clone(),
        short_code: code.to_string(),
        target_url: format!("{}?utm_campaign={}", product.source_url, campaign.utm_campaign),
        created_at: Utc::now(),
    }
}

// =============================================================================
// 商品 CRUD
// =============================================================================

#[tokio::test]
async fn test_product_insert_and_get() {
    let (storage, _dir) = create_temp_storage().await;

    let product = create_test_product(Marketplace::Shopee);
    storage.insert_product(product.clone()).await.unwrap();

    let loaded = storage.get_product(&product.id).await.unwrap().unwrap();
    assert_eq!(loaded.id, product.id);
    assert_eq!(loaded.marketplace, Marketplace::Shopee);
    assert_eq!(loaded.source_url, product.source_url);
}

#[tokio::test]
async fn test_get_missing_product_is_none() {
    let (storage, _dir) = create_temp_storage().await;

    let loaded = storage.get_product("no-such-id").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_list_products_newest_first() {
    let (storage, _dir) = create_temp_storage().await;

    let mut older = create_test_product(Marketplace::Shopee);
    older.created_at = Utc::now() - Duration::hours(2);
    let newer = create_test_product(Marketplace::Lazada);

    storage.insert_product(older.clone()).await.unwrap();
    storage.insert_product(newer.clone()).await.unwrap();

    let products = storage.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, newer.id);
    assert_eq!(products[1].id, older.id);
}

// =============================================================================
// 报价
// =============================================================================

#[tokio::test]
async fn test_offer_upsert_and_latest() {
    let (storage, _dir) = create_temp_storage().await;

    let product = create_test_product(Marketplace::Shopee);
    storage.insert_product(product.clone()).await.unwrap();

    let offer = Offer {
        id: "offer-1".to_string(),
        product_id: product.id.clone(),
        marketplace: Marketplace::Shopee,
        store_name: "Store A".to_string(),
        price: Decimal::new(12999, 2),
        last_checked_at: Utc::now(),
    };
    storage.upsert_offer(offer.clone()).await.unwrap();

    let latest = storage.latest_offer(&product.id).await.unwrap().unwrap();
    assert_eq!(latest.store_name, "Store A");
    assert_eq!(latest.price, Decimal::new(12999, 2));

    // 同一 id 再写一次是更新而不是报错
    let updated = Offer {
        price: Decimal::new(9999, 2),
        last_checked_at: Utc::now() + Duration::minutes(5),
        ..offer
    };
    storage.upsert_offer(updated).await.unwrap();

    let latest = storage.latest_offer(&product.id).await.unwrap().unwrap();
    assert_eq!(latest.price, Decimal::new(9999, 2));
}

#[tokio::test]
async fn test_latest_offer_without_history_is_none() {
    let (storage, _dir) = create_temp_storage().await;

    let product = create_test_product(Marketplace::Lazada);
    storage.insert_product(product.clone()).await.unwrap();

    assert!(storage.latest_offer(&product.id).await.unwrap().is_none());
}

// =============================================================================
// 活动
// =============================================================================

#[tokio::test]
async fn test_list_campaigns_scoped_to_owner() {
    let (storage, _dir) = create_temp_storage().await;

    let mine = create_test_campaign("user-1", "mine");
    let theirs = create_test_campaign("user-2", "theirs");
    storage.insert_campaign(mine.clone()).await.unwrap();
    storage.insert_campaign(theirs).await.unwrap();

    let campaigns = storage.list_campaigns("user-1").await.unwrap();
    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].id, mine.id);
}

#[tokio::test]
async fn test_active_campaigns_computed_from_window() {
    let (storage, _dir) = create_temp_storage().await;

    let active = create_test_campaign("user-1", "active");

    let mut expired = create_test_campaign("user-1", "expired");
    expired.start_at = Utc::now() - Duration::days(10);
    expired.end_at = Utc::now() - Duration::days(1);

    let mut upcoming = create_test_campaign("user-1", "upcoming");
    upcoming.start_at = Utc::now() + Duration::days(1);
    upcoming.end_at = Utc::now() + Duration::days(10);

    storage.insert_campaign(active.clone()).await.unwrap();
    storage.insert_campaign(expired).await.unwrap();
    storage.insert_campaign(upcoming).await.unwrap();

    let now_active = storage.list_active_campaigns(Utc::now()).await.unwrap();
    assert_eq!(now_active.len(), 1);
    assert_eq!(now_active[0].id, active.id);
}

// =============================================================================
// 级联删除
// =============================================================================

#[tokio::test]
async fn test_delete_campaign_cascades_links() {
    let (storage, _dir) = create_temp_storage().await;

    let campaign = create_test_campaign("user-1", "cascade");
    storage.insert_campaign(campaign.clone()).await.unwrap();

    // 挂三条链接
    for i in 0..3 {
        let product = create_test_product(Marketplace::Shopee);
        storage.insert_product(product.clone()).await.unwrap();
        let link = create_test_link(&campaign, &product, &format!("casc{:02}", i));
        storage.insert_link(&link).await.unwrap();
    }
    assert_eq!(
        storage.list_links_for_campaign(&campaign.id).await.unwrap().len(),
        3
    );

    storage.delete_campaign(&campaign.id).await.unwrap();

    assert!(storage.get_campaign(&campaign.id).await.unwrap().is_none());
    assert!(
        storage
            .list_links_for_campaign(&campaign.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_delete_campaign_twice_is_not_found() {
    let (storage, _dir) = create_temp_storage().await;

    let campaign = create_test_campaign("user-1", "twice");
    storage.insert_campaign(campaign.clone()).await.unwrap();

    storage.delete_campaign(&campaign.id).await.unwrap();
    let err = storage.delete_campaign(&campaign.id).await.unwrap_err();
    assert!(matches!(err, AfflinkError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_product_cascades_offers_and_links() {
    let (storage, _dir) = create_temp_storage().await;

    let product = create_test_product(Marketplace::Lazada);
    storage.insert_product(product.clone()).await.unwrap();

    let offer = Offer {
        id: "offer-x".to_string(),
        product_id: product.id.clone(),
        marketplace: Marketplace::Lazada,
        store_name: "Store".to_string(),
        price: Decimal::new(100, 0),
        last_checked_at: Utc::now(),
    };
    storage.upsert_offer(offer).await.unwrap();

    let campaign = create_test_campaign("user-1", "pcasc");
    storage.insert_campaign(campaign.clone()).await.unwrap();
    let link = create_test_link(&campaign, &product, "pcasc1");
    storage.insert_link(&link).await.unwrap();

    storage.delete_product(&product.id).await.unwrap();

    assert!(storage.get_product(&product.id).await.unwrap().is_none());
    assert!(storage.latest_offer(&product.id).await.unwrap().is_none());
    assert!(storage.find_by_code("pcasc1").await.unwrap().is_none());
    // 活动本身不受影响
    assert!(storage.get_campaign(&campaign.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_missing_product_is_not_found() {
    let (storage, _dir) = create_temp_storage().await;

    let err = storage.delete_product("ghost").await.unwrap_err();
    assert!(matches!(err, AfflinkError::NotFound(_)));
}
