//! Product catalog service

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::{AfflinkError, Result};
use crate::services::source_resolver::{OfferFetcher, SourceResolver};
use crate::storage::SeaOrmStorage;
use crate::storage::models::{Marketplace, Offer, Product};
use crate::utils::url_validator::{UrlValidationError, validate_source_url};

pub struct CatalogService {
    storage: Arc<SeaOrmStorage>,
    resolver: Arc<dyn SourceResolver>,
    offer_fetcher: Arc<dyn OfferFetcher>,
}

impl CatalogService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        resolver: Arc<dyn SourceResolver>,
        offer_fetcher: Arc<dyn OfferFetcher>,
    ) -> Self {
        Self {
            storage,
            resolver,
            offer_fetcher,
        }
    }

    /// 从商品页地址创建商品
    ///
    /// 同一地址重复提交会建出两个独立商品，这是有意为之：
    /// 去重由调用方按自己的口径处理。
    pub async fn create_product(
        &self,
        source_url: &str,
        marketplace: Marketplace,
    ) -> Result<Product> {
        validate_source_url(source_url, marketplace).map_err(|e| match e {
            UrlValidationError::MarketplaceMismatch(_) => {
                AfflinkError::invalid_source(e.to_string())
            }
            other => AfflinkError::invalid_input(other.to_string()),
        })?;

        let resolved = self.resolver.resolve_source(source_url, marketplace).await?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            title: resolved.title,
            image_url: resolved.image_url,
            source_url: resolved.canonical_source_url,
            marketplace,
            created_at: Utc::now(),
        };

        self.storage.insert_product(product.clone()).await?;

        info!(
            "CatalogService: created product '{}' ({})",
            product.id, product.marketplace
        );
        Ok(product)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.storage
            .get_product(id)
            .await?
            .ok_or_else(|| AfflinkError::not_found(format!("商品不存在: {}", id)))
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.storage.list_products().await
    }

    /// 删除商品，连带其报价与推广链接
    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.storage.delete_product(id).await?;
        info!("CatalogService: deleted product '{}'", id);
        Ok(())
    }

    /// 商品的最新报价，没有报价历史时返回 None
    pub async fn latest_offer(&self, product_id: &str) -> Result<Option<Offer>> {
        // 先确认商品存在，404 比空列表更诚实
        self.get_product(product_id).await?;
        self.storage.latest_offer(product_id).await
    }

    /// 向上游抓一次最新报价并落库
    pub async fn refresh_offer(&self, product_id: &str) -> Result<Option<Offer>> {
        let product = self.get_product(product_id).await?;

        let offer = self
            .offer_fetcher
            .fetch_offer(product_id, product.marketplace)
            .await?;

        if let Some(ref o) = offer {
            self.storage.upsert_offer(o.clone()).await?;
            info!(
                "CatalogService: refreshed offer for product '{}' ({} {})",
                product_id, o.store_name, o.price
            );
        }

        Ok(offer)
    }
}
