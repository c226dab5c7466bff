//! 推广链接的存储操作
//!
//! 唯一性约束完全由数据库兜底。插入时把唯一键冲突拆成两类上报：
//! 短码撞车（调用方换码重试）和 (活动, 商品) 重复（业务错误）。

use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{link_to_active_model, model_to_link};
use crate::errors::{AfflinkError, Result};
use crate::storage::models::Link;

use migration::entities::campaign_link;

/// insert_link 的失败分类
#[derive(Debug)]
pub enum LinkInsertError {
    /// short_code 唯一索引冲突，换一个码可以重试
    CodeCollision,
    /// (campaign_id, product_id) 唯一索引冲突
    PairDuplicate,
    Other(AfflinkError),
}

/// 根据约束冲突的报错文本判断撞到了哪条唯一索引
///
/// SQLite 报列名（campaign_links.short_code），MySQL/PostgreSQL
/// 报索引名（uq_campaign_links_short_code / uq_campaign_links_pair）。
fn classify_unique_violation(msg: &str) -> LinkInsertError {
    if msg.contains("short_code") {
        LinkInsertError::CodeCollision
    } else if msg.contains("uq_campaign_links_pair")
        || (msg.contains("campaign_id") && msg.contains("product_id"))
    {
        LinkInsertError::PairDuplicate
    } else {
        LinkInsertError::Other(AfflinkError::storage(format!("未知的唯一约束冲突: {}", msg)))
    }
}

fn classify_insert_error(e: DbErr) -> LinkInsertError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => classify_unique_violation(&msg),
        // 外键冲突：父级在服务层校验之后被级联删除了
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            LinkInsertError::Other(AfflinkError::not_found("活动或商品已被删除"))
        }
        _ => LinkInsertError::Other(AfflinkError::storage(format!("插入链接失败: {}", e))),
    }
}

impl SeaOrmStorage {
    /// 单条 INSERT，乐观写入；冲突分类交给调用方处理
    pub async fn insert_link(&self, link: &Link) -> std::result::Result<(), LinkInsertError> {
        link_to_active_model(link)
            .insert(&self.db)
            .await
            .map_err(classify_insert_error)?;

        debug!(
            "Link stored: {} ({} -> {})",
            link.id, link.short_code, link.target_url
        );
        Ok(())
    }

    pub async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>> {
        let model = campaign_link::Entity::find()
            .filter(campaign_link::Column::ShortCode.eq(short_code))
            .one(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("查询短码失败: {}", e)))?;

        Ok(model.map(model_to_link))
    }

    pub async fn find_link(&self, id: &str) -> Result<Option<Link>> {
        let model = campaign_link::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("查询链接失败: {}", e)))?;

        Ok(model.map(model_to_link))
    }

    /// 活动下的全部链接，按创建时间正序
    pub async fn list_links_for_campaign(&self, campaign_id: &str) -> Result<Vec<Link>> {
        let models = campaign_link::Entity::find()
            .filter(campaign_link::Column::CampaignId.eq(campaign_id))
            .order_by_asc(campaign_link::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("查询链接列表失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    /// 按 id 批量取链接（聚合时把 link_id 映射回活动和商品用）
    pub async fn find_links_by_ids(&self, ids: &[String]) -> Result<Vec<Link>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = campaign_link::Entity::find()
            .filter(campaign_link::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("批量查询链接失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    pub async fn delete_link(&self, id: &str) -> Result<()> {
        let result = campaign_link::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("删除链接失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AfflinkError::not_found(format!("链接不存在: {}", id)));
        }

        info!("Link deleted: {}", id);
        Ok(())
    }
}
