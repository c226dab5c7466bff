//! 存储操作的有界重试
//!
//! 点击写入和短码插入都可能碰上暂时性数据库错误（SQLite BUSY、
//! 死锁、连接池获取失败）。这里只重试这类错误；唯一约束冲突等
//! 永久性错误必须原样返回给调用方做语义分类。

use sea_orm::DbErr;
use sea_orm::error::RuntimeErr;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// 重试配置，来自 `database.retry_*` 配置项
#[derive(Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl RetryConfig {
    /// 第 `attempt` 次重试前的等待毫秒数：指数退避，封顶后加 0-25% 抖动
    fn delay_for(&self, attempt: u32) -> u64 {
        let doubled = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = doubled.min(self.max_delay_ms);
        capped.saturating_add(rand::random_range(0..=capped / 4))
    }
}

/// 执行 `run`，对可重试错误做最多 `max_retries` 次退避重试
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    run: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    with_retry_policy(operation_name, config, is_retryable_error, run).await
}

/// 同 `with_retry`，但由调用方给出哪些错误允许重试
pub async fn with_retry_policy<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    retryable: fn(&DbErr) -> bool,
    mut run: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut last_err: Option<DbErr> = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            sleep(Duration::from_millis(config.delay_for(attempt))).await;
        }
        match run().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("'{}' recovered on attempt {}", operation_name, attempt + 1);
                }
                return Ok(value);
            }
            Err(e) if retryable(&e) => {
                warn!(
                    "'{}' hit transient error (attempt {}/{}): {}",
                    operation_name,
                    attempt + 1,
                    config.max_retries + 1,
                    e
                );
                last_err = Some(e);
            }
            Err(e) => {
                debug!("'{}' failed permanently: {}", operation_name, e);
                return Err(e);
            }
        }
    }

    Err(last_err
        .unwrap_or_else(|| DbErr::Custom(format!("'{}' retries exhausted", operation_name))))
}

/// 非幂等追加（点击事件）用的分类
///
/// 连接在语句发出后断开时 INSERT 可能已经提交，重试会写出第二条
/// 记录，所以 `Conn` 按永久错误处理。池获取失败发生在语句发出前，
/// 锁竞争类错误意味着语句被回滚，两者重试都安全。
pub fn is_retryable_for_append(err: &DbErr) -> bool {
    match err {
        DbErr::Conn(_) => false,
        DbErr::ConnectionAcquire(_) => true,
        DbErr::Exec(inner) | DbErr::Query(inner) => runtime_err_is_transient(inner),
        _ => false,
    }
}

/// 只有连接类错误和锁竞争类错误算暂时性
pub fn is_retryable_error(err: &DbErr) -> bool {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => true,
        DbErr::Exec(inner) | DbErr::Query(inner) => runtime_err_is_transient(inner),
        _ => false,
    }
}

fn runtime_err_is_transient(err: &RuntimeErr) -> bool {
    if let RuntimeErr::SqlxError(sqlx_err) = err
        && let Some(db_err) = (**sqlx_err).as_database_error()
        && let Some(code) = db_err.code()
    {
        // MySQL 死锁/锁超时，PostgreSQL 序列化失败/死锁，SQLite BUSY/LOCKED
        return matches!(
            code.as_ref(),
            "1213" | "1205" | "40001" | "40P01" | "5" | "6"
        );
    }

    // 驱动没给错误码时退化成消息匹配
    let text = match err {
        RuntimeErr::SqlxError(e) => e.to_string().to_lowercase(),
        RuntimeErr::Internal(msg) => msg.to_lowercase(),
        #[allow(unreachable_patterns)]
        _ => return false,
    };
    [
        "deadlock",
        "lock wait timeout",
        "database is locked",
        "serialization failure",
    ]
    .iter()
    .any(|needle| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            base_delay_ms: 5,
            max_delay_ms: 20,
        }
    }

    #[test]
    fn test_connection_errors_are_transient() {
        assert!(is_retryable_error(&DbErr::ConnectionAcquire(
            sea_orm::error::ConnAcquireErr::Timeout
        )));
        assert!(is_retryable_error(&DbErr::Conn(RuntimeErr::Internal(
            "connection reset".to_string()
        ))));
    }

    #[test]
    fn test_lock_contention_is_transient() {
        assert!(is_retryable_error(&DbErr::Query(RuntimeErr::Internal(
            "database is locked".to_string()
        ))));
        assert!(is_retryable_error(&DbErr::Exec(RuntimeErr::Internal(
            "Deadlock found when trying to get lock".to_string()
        ))));
    }

    #[test]
    fn test_other_errors_are_permanent() {
        assert!(!is_retryable_error(&DbErr::RecordNotFound(
            "gone".to_string()
        )));
        assert!(!is_retryable_error(&DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: campaign_links.short_code".to_string(),
        ))));
    }

    #[test]
    fn test_delay_doubles_then_caps() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        };
        assert!((100..=125).contains(&config.delay_for(1)));
        assert!((200..=250).contains(&config.delay_for(2)));
        assert!((400..=500).contains(&config.delay_for(3)));
        // 远超封顶值的尝试次数停在 max + 抖动
        assert!((2000..=2500).contains(&config.delay_for(10)));
    }

    #[tokio::test]
    async fn test_first_success_runs_once() {
        let calls = AtomicU32::new(0);
        let result = with_retry("op", fast_config(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, DbErr>(7) }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_errors_retried_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry("op", fast_config(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(DbErr::ConnectionAcquire(
                        sea_orm::error::ConnAcquireErr::Timeout,
                    ))
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transient_errors_give_up_after_budget() {
        let calls = AtomicU32::new(0);
        let result = with_retry("op", fast_config(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<i32, _>(DbErr::ConnectionAcquire(
                    sea_orm::error::ConnAcquireErr::Timeout,
                ))
            }
        })
        .await;
        assert!(result.is_err());
        // 初始调用 + max_retries 次重试
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_append_policy_treats_connection_loss_as_permanent() {
        assert!(!is_retryable_for_append(&DbErr::Conn(
            RuntimeErr::Internal("connection reset".to_string())
        )));
        assert!(is_retryable_for_append(&DbErr::ConnectionAcquire(
            sea_orm::error::ConnAcquireErr::Timeout
        )));
        assert!(is_retryable_for_append(&DbErr::Query(
            RuntimeErr::Internal("database is locked".to_string())
        )));
    }

    #[tokio::test]
    async fn test_append_policy_runs_once_on_connection_loss() {
        let calls = AtomicU32::new(0);
        let result = with_retry_policy("append", fast_config(), is_retryable_for_append, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<i32, _>(DbErr::Conn(RuntimeErr::Internal(
                    "connection reset".to_string(),
                )))
            }
        })
        .await;
        assert!(result.is_err());
        // 语句可能已提交，绝不能再发第二次
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result = with_retry("op", fast_config(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<i32, _>(DbErr::RecordNotFound("gone".to_string())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
