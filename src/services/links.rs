//! Affiliate link service
//!
//! Creates short-coded links inside a campaign. Code uniqueness is enforced
//! by the database; generation is optimistic with a bounded retry.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::get_config;
use crate::errors::{AfflinkError, Result};
use crate::storage::models::Link;
use crate::storage::{LinkInsertError, SeaOrmStorage};
use crate::utils::generate_random_code;

/// 短码碰撞后的最大重试次数
const MAX_CODE_ATTEMPTS: usize = 5;

/// 在商品页地址上写入 utm_campaign 参数
///
/// 已有的查询参数原样保留；已存在 utm_campaign 时覆盖而不追加，
/// 保证最终地址里该参数只出现一次。
pub fn compose_target_url(source_url: &str, utm_campaign: &str) -> Result<String> {
    let mut url = Url::parse(source_url)
        .map_err(|e| AfflinkError::invalid_input(format!("商品页地址无法解析: {}", e)))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "utm_campaign")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair("utm_campaign", utm_campaign);
    }

    Ok(url.to_string())
}

pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    fn code_length(&self) -> usize {
        get_config().redirect.code_length
    }

    /// 在活动下为商品创建推广链接
    pub async fn create_link(&self, campaign_id: &str, product_id: &str) -> Result<Link> {
        let campaign = self
            .storage
            .get_campaign(campaign_id)
            .await?
            .ok_or_else(|| AfflinkError::not_found(format!("活动不存在: {}", campaign_id)))?;

        let product = self
            .storage
            .get_product(product_id)
            .await?
            .ok_or_else(|| AfflinkError::not_found(format!("商品不存在: {}", product_id)))?;

        let target_url = compose_target_url(&product.source_url, &campaign.utm_campaign)?;

        // 乐观插入：生成短码直接写，撞车换码重试
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let link = Link {
                id: Uuid::new_v4().to_string(),
                campaign_id: campaign_id.to_string(),
                product_id: product_id.to_string(),
                short_code: generate_random_code(self.code_length()),
                target_url: target_url.clone(),
                created_at: Utc::now(),
            };

            match self.storage.insert_link(&link).await {
                Ok(()) => {
                    info!(
                        "LinkService: created link '{}' ({}) in campaign '{}'",
                        link.id, link.short_code, campaign_id
                    );
                    return Ok(link);
                }
                Err(LinkInsertError::CodeCollision) => {
                    warn!(
                        "LinkService: short code collision (attempt {}/{})",
                        attempt, MAX_CODE_ATTEMPTS
                    );
                    continue;
                }
                Err(LinkInsertError::PairDuplicate) => {
                    return Err(AfflinkError::duplicate_link(format!(
                        "活动 '{}' 下已存在商品 '{}' 的链接",
                        campaign_id, product_id
                    )));
                }
                Err(LinkInsertError::Other(e)) => return Err(e),
            }
        }

        Err(AfflinkError::code_space_exhausted(format!(
            "连续 {} 次短码碰撞，放弃生成",
            MAX_CODE_ATTEMPTS
        )))
    }

    /// 按短码查链接，纯查询，不记点击
    pub async fn resolve_by_code(&self, short_code: &str) -> Result<Link> {
        self.storage
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| AfflinkError::not_found("短码不存在"))
    }

    pub async fn get_link(&self, id: &str) -> Result<Link> {
        self.storage
            .find_link(id)
            .await?
            .ok_or_else(|| AfflinkError::not_found(format!("链接不存在: {}", id)))
    }

    pub async fn list_links_for_campaign(&self, campaign_id: &str) -> Result<Vec<Link>> {
        self.storage.list_links_for_campaign(campaign_id).await
    }

    pub async fn delete_link(&self, id: &str) -> Result<()> {
        self.storage.delete_link(id).await?;
        info!("LinkService: deleted link '{}'", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_preserves_existing_params() {
        let out = compose_target_url("https://shopee.sg/item/123?ref=abc", "summer_sale").unwrap();

        assert!(out.contains("ref=abc"));
        assert!(out.contains("utm_campaign=summer_sale"));
        assert_eq!(out.matches("utm_campaign").count(), 1);
    }

    #[test]
    fn test_compose_overwrites_existing_utm() {
        let out = compose_target_url(
            "https://shopee.sg/item/123?utm_campaign=old&ref=abc",
            "new_tag",
        )
        .unwrap();

        assert!(out.contains("utm_campaign=new_tag"));
        assert!(!out.contains("utm_campaign=old"));
        assert_eq!(out.matches("utm_campaign").count(), 1);
        assert!(out.contains("ref=abc"));
    }

    #[test]
    fn test_compose_bare_url() {
        let out = compose_target_url("https://lazada.sg/products/x", "promo").unwrap();
        assert_eq!(out, "https://lazada.sg/products/x?utm_campaign=promo");
    }

    #[test]
    fn test_compose_rejects_garbage() {
        assert!(compose_target_url("not a url", "promo").is_err());
    }
}
