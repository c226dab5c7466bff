//! 推广活动的存储操作

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{campaign_to_active_model, model_to_campaign};
use super::retry;
use crate::errors::{AfflinkError, Result};
use crate::storage::models::Campaign;

use migration::entities::{campaign, campaign_link};

impl SeaOrmStorage {
    pub async fn insert_campaign(&self, c: Campaign) -> Result<()> {
        let db = &self.db;

        retry::with_retry(
            &format!("insert_campaign({})", c.id),
            self.retry_config,
            || async { campaign_to_active_model(&c).insert(db).await },
        )
        .await
        .map_err(|e| AfflinkError::storage(format!("插入活动失败: {}", e)))?;

        info!("Campaign stored: {} ({})", c.id, c.name);
        Ok(())
    }

    pub async fn get_campaign(&self, id: &str) -> Result<Option<Campaign>> {
        let model = campaign::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("查询活动失败: {}", e)))?;

        Ok(model.map(model_to_campaign))
    }

    /// 某个用户的全部活动，按创建时间倒序
    pub async fn list_campaigns(&self, owner_user_id: &str) -> Result<Vec<Campaign>> {
        let models = campaign::Entity::find()
            .filter(campaign::Column::OwnerUserId.eq(owner_user_id))
            .order_by_desc(campaign::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("查询活动列表失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_campaign).collect())
    }

    /// 按 id 批量取活动（聚合时补活动名用）
    pub async fn find_campaigns_by_ids(&self, ids: &[String]) -> Result<Vec<Campaign>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = campaign::Entity::find()
            .filter(campaign::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("批量查询活动失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_campaign).collect())
    }

    /// 当前时刻处于投放窗口内的活动（实时计算，不落库）
    pub async fn list_active_campaigns(&self, now: DateTime<Utc>) -> Result<Vec<Campaign>> {
        let models = campaign::Entity::find()
            .filter(campaign::Column::StartAt.lte(now))
            .filter(campaign::Column::EndAt.gte(now))
            .order_by_desc(campaign::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("查询活动列表失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_campaign).collect())
    }

    /// 删除活动及其下全部推广链接（单事务）
    pub async fn delete_campaign(&self, id: &str) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AfflinkError::storage(format!("开始事务失败: {}", e)))?;

        campaign_link::Entity::delete_many()
            .filter(campaign_link::Column::CampaignId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AfflinkError::storage(format!("级联删除链接失败: {}", e)))?;

        let result = campaign::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AfflinkError::storage(format!("删除活动失败: {}", e)))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| AfflinkError::storage(format!("回滚事务失败: {}", e)))?;
            return Err(AfflinkError::not_found(format!("活动不存在: {}", id)));
        }

        txn.commit()
            .await
            .map_err(|e| AfflinkError::storage(format!("提交事务失败: {}", e)))?;

        info!("Campaign deleted with links: {}", id);
        Ok(())
    }
}
