use std::sync::Arc;

use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::{LinkInsertError, LinkTotalRow, SeaOrmStorage, SeriesRow};
pub use models::{Campaign, ClickEvent, Link, Marketplace, Offer, Product};

pub struct StorageFactory;

impl StorageFactory {
    /// 按配置的 database_url 建立存储，后端类型从 URL 推断
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let url = crate::config::get_config().database.database_url.clone();
        let backend_type = backend::infer_backend_from_url(&url)?;
        Ok(Arc::new(
            backend::SeaOrmStorage::new(&url, &backend_type).await?,
        ))
    }
}
