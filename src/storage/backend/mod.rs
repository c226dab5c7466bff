//! SeaORM 存储后端：SQLite / MySQL (MariaDB) / PostgreSQL

mod campaigns;
mod catalog;
mod click_sink;
mod connection;
mod converters;
mod links;
mod metrics;
pub mod retry;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::analytics::ClickSink;
use crate::errors::{AfflinkError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use links::LinkInsertError;
pub use metrics::{LinkTotalRow, SeriesRow};

/// 根据数据库 URL 推断后端类型（mariadb 归入 mysql）
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    let scheme = database_url.split("://").next().unwrap_or("");
    let backend = match scheme {
        "sqlite" => "sqlite",
        "mysql" | "mariadb" => "mysql",
        "postgres" | "postgresql" => "postgres",
        // 裸文件路径按 SQLite 处理
        _ if database_url.ends_with(".db")
            || database_url.ends_with(".sqlite")
            || database_url == ":memory:" =>
        {
            "sqlite"
        }
        _ => {
            return Err(AfflinkError::database_config(format!(
                "无法从 URL 推断数据库类型: {} （支持 sqlite:// mysql:// mariadb:// postgres://）",
                database_url
            )));
        }
    };
    Ok(backend.to_string())
}

/// 所有持久化操作的入口，按操作组拆分在子模块里实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(AfflinkError::database_config("DATABASE_URL 未设置"));
        }

        let db_config = &crate::config::get_config().database;
        let retry_config = retry::RetryConfig {
            max_retries: db_config.retry_count,
            base_delay_ms: db_config.retry_base_delay_ms,
            max_delay_ms: db_config.retry_max_delay_ms,
        };

        let db = match backend_name {
            "sqlite" => connect_sqlite(database_url).await?,
            other => connect_generic(database_url, other).await?,
        };
        run_migrations(&db).await?;

        info!("{} storage ready", backend_name.to_uppercase());
        Ok(SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        })
    }

    pub fn get_backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn as_click_sink(self: &Arc<Self>) -> Arc<dyn ClickSink> {
        Arc::clone(self) as Arc<dyn ClickSink>
    }

    /// 测试和需要裸连接的场景用
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 存活检查：一次最小往返
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| AfflinkError::storage(format!("数据库存活检查失败: {}", e)))
    }
}
