//! Campaign management service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AfflinkError, Result};
use crate::storage::SeaOrmStorage;
use crate::storage::models::Campaign;

pub struct CampaignService {
    storage: Arc<SeaOrmStorage>,
}

impl CampaignService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn create_campaign(
        &self,
        owner_user_id: &str,
        name: &str,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        utm_campaign: &str,
    ) -> Result<Campaign> {
        if name.trim().is_empty() {
            return Err(AfflinkError::invalid_input("活动名称不能为空"));
        }
        if utm_campaign.trim().is_empty() {
            return Err(AfflinkError::invalid_input("utm_campaign 不能为空"));
        }
        if end_at <= start_at {
            return Err(AfflinkError::invalid_input(format!(
                "投放窗口无效: end_at ({}) 必须晚于 start_at ({})",
                end_at, start_at
            )));
        }

        let campaign = Campaign {
            id: Uuid::new_v4().to_string(),
            owner_user_id: owner_user_id.to_string(),
            name: name.trim().to_string(),
            start_at,
            end_at,
            utm_campaign: utm_campaign.trim().to_string(),
            created_at: Utc::now(),
        };

        self.storage.insert_campaign(campaign.clone()).await?;

        info!(
            "CampaignService: created campaign '{}' for owner '{}'",
            campaign.id, owner_user_id
        );
        Ok(campaign)
    }

    pub async fn get_campaign(&self, id: &str) -> Result<Campaign> {
        self.storage
            .get_campaign(id)
            .await?
            .ok_or_else(|| AfflinkError::not_found(format!("活动不存在: {}", id)))
    }

    pub async fn list_campaigns(&self, owner_user_id: &str) -> Result<Vec<Campaign>> {
        self.storage.list_campaigns(owner_user_id).await
    }

    /// 当前处于投放窗口内的活动，每次调用现算
    pub async fn list_active_campaigns(&self) -> Result<Vec<Campaign>> {
        self.storage.list_active_campaigns(Utc::now()).await
    }

    /// 删除活动及其链接；重复删除返回 NotFound
    pub async fn delete_campaign(&self, id: &str) -> Result<()> {
        self.storage.delete_campaign(id).await?;
        info!("CampaignService: deleted campaign '{}'", id);
        Ok(())
    }
}
