//! API 请求/响应类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::models::Marketplace;

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CreateProductRequest {
    pub source_url: String,
    pub marketplace: Marketplace,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub utm_campaign: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CreateLinkRequest {
    pub campaign_id: String,
    pub product_id: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MetricsQuery {
    pub start_at: String,
    pub end_at: String,
}
