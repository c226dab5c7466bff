use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::errors::{AfflinkError, Result};
use migration::{Migrator, MigratorTrait};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);
const MAX_LIFETIME: Duration = Duration::from_secs(3600);
const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite 连接：自动建库，WAL 模式降低重定向路径上的写锁竞争
pub async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
    use sea_orm::SqlxSqliteConnector;
    use sea_orm::sqlx::SqlitePool;
    use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AfflinkError::database_config(format!("SQLite URL 解析失败: {}", e)))?
        .create_if_missing(true)
        // campaign_links 的父级外键依赖这个 pragma
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(SQLITE_BUSY_TIMEOUT)
        .pragma("cache_size", "-64000")
        .pragma("temp_store", "memory");

    let pool = SqlitePool::connect_with(options)
        .await
        .map_err(|e| AfflinkError::database_connection(format!("无法连接 SQLite: {}", e)))?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// MySQL / PostgreSQL 连接，池大小取自配置
pub async fn connect_generic(database_url: &str, backend_name: &str) -> Result<DatabaseConnection> {
    let pool_size = crate::config::get_config().database.pool_size;

    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(pool_size)
        .min_connections(pool_size.min(5))
        .connect_timeout(CONNECT_TIMEOUT)
        .acquire_timeout(CONNECT_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .sqlx_logging(false);

    Database::connect(options).await.map_err(|e| {
        AfflinkError::database_connection(format!(
            "无法连接 {} 数据库: {}",
            backend_name.to_uppercase(),
            e
        ))
    })
}

/// 启动时把 schema 迁移到最新版本
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| AfflinkError::storage(format!("数据库迁移失败: {}", e)))?;

    info!("Database migrations completed");
    Ok(())
}
