//! Dashboard metrics aggregation
//!
//! Two-step aggregation: the database groups click_events by
//! (day, link, marketplace), then link rows are folded up to campaign level
//! in memory with campaign names joined in. Buckets with zero clicks are
//! simply absent from the series.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::errors::{AfflinkError, Result};
use crate::storage::SeaOrmStorage;
use crate::storage::models::Product;

/// 序列中的一个点：某天某活动在某市场的点击数
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub click_count: i64,
    pub campaign_id: String,
    pub campaign_name: String,
    pub marketplace: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub product: Product,
    pub clicks: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardMetrics {
    pub top_product: Option<TopProduct>,
    pub series: Vec<SeriesPoint>,
}

pub struct MetricsService {
    storage: Arc<SeaOrmStorage>,
}

impl MetricsService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// [start, end) 区间内的看板数据
    pub async fn get_metrics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DashboardMetrics> {
        if end <= start {
            return Err(AfflinkError::invalid_input(format!(
                "统计区间无效: end ({}) 必须晚于 start ({})",
                end, start
            )));
        }

        let rows = self.storage.click_series(start, end).await?;
        let totals = self.storage.click_totals_per_link(start, end).await?;

        // 点击涉及的全部链接，一次取回
        let mut link_ids: Vec<String> = rows.iter().map(|r| r.link_id.clone()).collect();
        link_ids.extend(totals.iter().map(|t| t.link_id.clone()));
        link_ids.sort();
        link_ids.dedup();

        let links = self.storage.find_links_by_ids(&link_ids).await?;
        let link_map: HashMap<&str, (&str, &str)> = links
            .iter()
            .map(|l| (l.id.as_str(), (l.campaign_id.as_str(), l.product_id.as_str())))
            .collect();

        let series = self.build_series(&rows, &link_map).await?;
        let top_product = self.build_top_product(&totals, &link_map).await?;

        debug!(
            "MetricsService: {} series points, top_product={}",
            series.len(),
            top_product.as_ref().map(|t| t.product.id.as_str()).unwrap_or("none")
        );

        Ok(DashboardMetrics {
            top_product,
            series,
        })
    }

    async fn build_series(
        &self,
        rows: &[crate::storage::SeriesRow],
        link_map: &HashMap<&str, (&str, &str)>,
    ) -> Result<Vec<SeriesPoint>> {
        // 链接级别的行折到活动级别；BTreeMap 顺带给出
        // (日期, 活动, 市场) 的确定性排序
        let mut folded: BTreeMap<(String, String, String), i64> = BTreeMap::new();

        for row in rows {
            // 链接在聚合后被删掉的话对应行丢弃
            let Some((campaign_id, _)) = link_map.get(row.link_id.as_str()) else {
                continue;
            };
            *folded
                .entry((
                    row.bucket.clone(),
                    campaign_id.to_string(),
                    row.marketplace.clone(),
                ))
                .or_insert(0) += row.count;
        }

        let mut campaign_ids: Vec<String> =
            folded.keys().map(|(_, c, _)| c.clone()).collect();
        campaign_ids.sort();
        campaign_ids.dedup();

        let campaigns = self.storage.find_campaigns_by_ids(&campaign_ids).await?;
        let name_map: HashMap<&str, &str> = campaigns
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();

        Ok(folded
            .into_iter()
            .map(|((date, campaign_id, marketplace), click_count)| {
                let campaign_name = name_map
                    .get(campaign_id.as_str())
                    .map(|n| n.to_string())
                    .unwrap_or_default();
                SeriesPoint {
                    date,
                    click_count,
                    campaign_id,
                    campaign_name,
                    marketplace,
                }
            })
            .collect())
    }

    async fn build_top_product(
        &self,
        totals: &[crate::storage::LinkTotalRow],
        link_map: &HashMap<&str, (&str, &str)>,
    ) -> Result<Option<TopProduct>> {
        let mut per_product: HashMap<&str, i64> = HashMap::new();
        for t in totals {
            if let Some((_, product_id)) = link_map.get(t.link_id.as_str()) {
                *per_product.entry(product_id).or_insert(0) += t.count;
            }
        }

        // 点击数最高者胜出，并列时取 id 最小的商品
        let winner = per_product
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)));

        let Some((product_id, clicks)) = winner else {
            return Ok(None);
        };

        let product = self
            .storage
            .get_product(product_id)
            .await?
            .ok_or_else(|| AfflinkError::not_found(format!("商品不存在: {}", product_id)))?;

        Ok(Some(TopProduct { product, clicks }))
    }
}
