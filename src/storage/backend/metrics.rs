//! 点击事件的聚合查询
//!
//! 供 MetricsService 调用。日期按天分桶，分桶表达式依数据库方言切换。

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DbBackend, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect,
    sea_query::Expr,
};

use crate::errors::{AfflinkError, Result};

use migration::entities::click_event;

/// 序列查询结果行：某一天、某条链接、某个市场的点击数
#[derive(Debug, FromQueryResult)]
pub struct SeriesRow {
    pub bucket: String,
    pub link_id: String,
    pub marketplace: String,
    pub count: i64,
}

/// 链接总点击数结果行
#[derive(Debug, FromQueryResult)]
pub struct LinkTotalRow {
    pub link_id: String,
    pub count: i64,
}

impl super::SeaOrmStorage {
    fn get_db_backend(&self) -> DbBackend {
        match self.get_backend_name() {
            "sqlite" => DbBackend::Sqlite,
            "mysql" => DbBackend::MySql,
            _ => DbBackend::Postgres,
        }
    }

    /// occurred_at 按天分桶的表达式（YYYY-MM-DD）
    fn day_bucket_expr(&self) -> Expr {
        match self.get_db_backend() {
            DbBackend::Sqlite => Expr::cust("strftime('%Y-%m-%d', occurred_at)"),
            DbBackend::MySql => Expr::cust("DATE_FORMAT(occurred_at, '%Y-%m-%d')"),
            _ => Expr::cust("TO_CHAR(occurred_at, 'YYYY-MM-DD')"),
        }
    }

    /// [start, end) 半开区间内按（天，链接，市场）分组的点击数
    ///
    /// 零点击的分组没有行，调用方不做零值填充。
    pub async fn click_series(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SeriesRow>> {
        let bucket = self.day_bucket_expr();

        click_event::Entity::find()
            .select_only()
            .column_as(bucket.clone(), "bucket")
            .column(click_event::Column::LinkId)
            .column(click_event::Column::Marketplace)
            .column_as(click_event::Column::Id.count(), "count")
            .filter(click_event::Column::OccurredAt.gte(start))
            .filter(click_event::Column::OccurredAt.lt(end))
            .group_by(bucket)
            .group_by(click_event::Column::LinkId)
            .group_by(click_event::Column::Marketplace)
            .order_by_asc(Expr::cust("bucket"))
            .into_model::<SeriesRow>()
            .all(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("聚合点击序列失败: {}", e)))
    }

    /// [start, end) 内每条链接的总点击数
    pub async fn click_totals_per_link(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<LinkTotalRow>> {
        click_event::Entity::find()
            .select_only()
            .column(click_event::Column::LinkId)
            .column_as(click_event::Column::Id.count(), "count")
            .filter(click_event::Column::OccurredAt.gte(start))
            .filter(click_event::Column::OccurredAt.lt(end))
            .group_by(click_event::Column::LinkId)
            .order_by_desc(Expr::cust("count"))
            .into_model::<LinkTotalRow>()
            .all(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("统计链接点击失败: {}", e)))
    }
}
