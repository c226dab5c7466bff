//! Redirect resolution
//!
//! A click only counts if it is durably logged; the event is written before
//! the target URL is handed back, and a failed write aborts the redirect.
//! Undercounting is acceptable, overcounting is not.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::analytics::ClickSink;
use crate::errors::{AfflinkError, Result};
use crate::storage::SeaOrmStorage;
use crate::storage::models::ClickEvent;
use crate::utils::is_valid_short_code;

pub struct RedirectService {
    storage: Arc<SeaOrmStorage>,
    sink: Arc<dyn ClickSink>,
}

impl RedirectService {
    pub fn new(storage: Arc<SeaOrmStorage>, sink: Arc<dyn ClickSink>) -> Self {
        Self { storage, sink }
    }

    /// 解析短码并记录一次点击，返回跳转目标地址
    ///
    /// 格式非法、短码不存在一律返回同一个 NotFound，不泄露区别。
    #[instrument(skip(self), fields(code = %short_code))]
    pub async fn resolve(&self, short_code: &str) -> Result<String> {
        if !is_valid_short_code(short_code) {
            debug!("Rejected malformed code");
            return Err(AfflinkError::not_found("Not Found"));
        }

        let link = self
            .storage
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| AfflinkError::not_found("Not Found"))?;

        // 市场信息从链接挂着的商品上取
        let product = self
            .storage
            .get_product(&link.product_id)
            .await?
            .ok_or_else(|| AfflinkError::not_found("Not Found"))?;

        let event = ClickEvent {
            link_id: link.id.clone(),
            occurred_at: Utc::now(),
            marketplace: product.marketplace,
        };

        // 先落点击再放行跳转
        self.sink
            .record_clicks(vec![event])
            .await
            .map_err(|e| AfflinkError::storage(format!("点击事件写入失败: {}", e)))?;

        debug!("Click logged, redirecting to {}", link.target_url);
        Ok(link.target_url)
    }
}
