//! External marketplace collaborators
//!
//! Product metadata and offers come from outside the system. The traits here
//! are the seam; production integrations live behind them. `StubResolver` is
//! a deterministic implementation for development and tests.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use url::Url;

use crate::errors::{AfflinkError, Result};
use crate::storage::models::{Marketplace, Offer};

/// 从商品页解析出来的元数据
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub title: String,
    pub image_url: String,
    /// 规范化后的商品页地址
    pub canonical_source_url: String,
}

/// 解析市场商品页，取回标题和主图
#[async_trait]
pub trait SourceResolver: Send + Sync {
    async fn resolve_source(
        &self,
        source_url: &str,
        marketplace: Marketplace,
    ) -> Result<ResolvedSource>;
}

/// 抓取商品当前报价
#[async_trait]
pub trait OfferFetcher: Send + Sync {
    async fn fetch_offer(&self, product_id: &str, marketplace: Marketplace)
    -> Result<Option<Offer>>;
}

/// 确定性的桩实现：标题取 URL 路径最后一段
pub struct StubResolver;

impl StubResolver {
    fn title_from_path(url: &Url) -> String {
        url.path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|s| !s.is_empty())
            .map(|s| s.replace(['-', '_'], " "))
            .unwrap_or_else(|| "Untitled product".to_string())
    }
}

#[async_trait]
impl SourceResolver for StubResolver {
    async fn resolve_source(
        &self,
        source_url: &str,
        marketplace: Marketplace,
    ) -> Result<ResolvedSource> {
        let url = Url::parse(source_url)
            .map_err(|e| AfflinkError::invalid_source(format!("无法解析商品页地址: {}", e)))?;

        Ok(ResolvedSource {
            title: Self::title_from_path(&url),
            image_url: format!("https://img.{}.example/placeholder.jpg", marketplace),
            canonical_source_url: url.to_string(),
        })
    }
}

#[async_trait]
impl OfferFetcher for StubResolver {
    async fn fetch_offer(
        &self,
        product_id: &str,
        marketplace: Marketplace,
    ) -> Result<Option<Offer>> {
        Ok(Some(Offer {
            id: format!("offer-{}", product_id),
            product_id: product_id.to_string(),
            marketplace,
            store_name: "Stub Store".to_string(),
            price: Decimal::new(9900, 2),
            last_checked_at: Utc::now(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_resolver_title_from_path() {
        let resolved = StubResolver
            .resolve_source("https://shopee.sg/wireless-earbuds-pro", Marketplace::Shopee)
            .await
            .unwrap();

        assert_eq!(resolved.title, "wireless earbuds pro");
        assert_eq!(
            resolved.canonical_source_url,
            "https://shopee.sg/wireless-earbuds-pro"
        );
    }

    #[tokio::test]
    async fn test_stub_resolver_empty_path() {
        let resolved = StubResolver
            .resolve_source("https://shopee.sg/", Marketplace::Shopee)
            .await
            .unwrap();

        assert_eq!(resolved.title, "Untitled product");
    }

    #[tokio::test]
    async fn test_stub_resolver_rejects_garbage() {
        let result = StubResolver
            .resolve_source("not a url", Marketplace::Lazada)
            .await;

        assert!(result.is_err());
    }
}
