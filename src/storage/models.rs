use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 接入的商品市场
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    Shopee,
    Lazada,
}

impl std::fmt::Display for Marketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shopee => write!(f, "shopee"),
            Self::Lazada => write!(f, "lazada"),
        }
    }
}

impl std::str::FromStr for Marketplace {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shopee" => Ok(Self::Shopee),
            "lazada" => Ok(Self::Lazada),
            _ => Err(format!("Unknown marketplace: '{}'. Valid: shopee, lazada", s)),
        }
    }
}

/// 外部市场商品
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub source_url: String,
    pub marketplace: Marketplace,
    pub created_at: DateTime<Utc>,
}

/// 商品在某个市场的价格/店铺快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub product_id: String,
    pub marketplace: Marketplace,
    pub store_name: String,
    pub price: Decimal,
    pub last_checked_at: DateTime<Utc>,
}

/// 营销活动（带属主和有效期窗口）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub utm_campaign: String,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    /// 活动是否处于有效期内（总是现算，不存标志位）
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.start_at <= now && now <= self.end_at
    }
}

/// (campaign, product) 配对的归因短链接
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub campaign_id: String,
    pub product_id: String,
    pub short_code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

/// 单次跳转的点击事件（只追加）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickEvent {
    pub link_id: String,
    pub occurred_at: DateTime<Utc>,
    /// 从链接对应商品冗余下来，聚合时无需 join products
    pub marketplace: Marketplace,
}
