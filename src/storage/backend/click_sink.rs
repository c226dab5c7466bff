//! ClickSink implementation for SeaOrmStorage
//!
//! Click events are append-only rows in `click_events`. Errors propagate to
//! the caller so a failed append can abort the redirect that produced it.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, EntityTrait};
use tracing::debug;

use super::SeaOrmStorage;
use super::retry;
use crate::analytics::ClickSink;
use crate::storage::models::ClickEvent;

use migration::entities::click_event;

#[async_trait]
impl ClickSink for SeaOrmStorage {
    async fn record_clicks(&self, events: Vec<ClickEvent>) -> anyhow::Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let total_count = events.len();

        // 构建批量插入的 ActiveModel 列表
        let models: Vec<click_event::ActiveModel> = events
            .iter()
            .map(|ev| click_event::ActiveModel {
                link_id: Set(ev.link_id.clone()),
                occurred_at: Set(ev.occurred_at),
                marketplace: Set(ev.marketplace.to_string()),
                ..Default::default()
            })
            .collect();

        // 追加不幂等：用只重试执行前失败的策略，保证一次跳转至多一条记录
        let db = &self.db;
        retry::with_retry_policy(
            "record_clicks",
            self.retry_config,
            retry::is_retryable_for_append,
            || async { click_event::Entity::insert_many(models.clone()).exec(db).await },
        )
        .await
        .map_err(|e| anyhow::anyhow!("Failed to insert click events: {}", e))?;

        debug!(
            "Click events written to {} database ({} records)",
            self.backend_name.to_uppercase(),
            total_count
        );

        Ok(())
    }
}
