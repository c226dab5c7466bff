use crate::storage::models::ClickEvent;

/// 点击事件 Sink
///
/// 实现方必须把事件持久化后才返回 Ok；失败要如实上报，
/// 这样跳转链路才能在落库失败时拒绝跳转（宁可少计，不可多计）。
#[async_trait::async_trait]
pub trait ClickSink: Send + Sync {
    async fn record_clicks(&self, events: Vec<ClickEvent>) -> anyhow::Result<()>;
}

/// 打印到标准输出的 Sink，开发调试用
pub struct StdoutSink;

#[async_trait::async_trait]
impl ClickSink for StdoutSink {
    async fn record_clicks(&self, events: Vec<ClickEvent>) -> anyhow::Result<()> {
        for ev in &events {
            println!("Click: {} @ {} ({})", ev.link_id, ev.occurred_at, ev.marketplace);
        }
        Ok(())
    }
}
