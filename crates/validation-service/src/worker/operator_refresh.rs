//! 外部操作符刷新 Worker
//!
//! 以固定周期从外部来源拉取操作符并整体替换注册表的外部子集。
//! 刷新与请求处理完全解耦：失败只记录日志并在下个周期重试，
//! 在途求值始终看到上一次成功发布的快照。

use std::sync::Arc;
use std::time::Duration;

use rules_engine::{ExternalOperatorSource, OperatorRegistry};
use tokio::sync::watch;
use tracing::{info, warn};

/// 外部操作符刷新 Worker
pub struct OperatorRefreshWorker {
    registry: Arc<OperatorRegistry>,
    source: Arc<dyn ExternalOperatorSource>,
    /// 刷新周期
    interval: Duration,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl OperatorRefreshWorker {
    /// 创建 Worker 实例
    ///
    /// # 参数
    /// - `registry`: 被刷新的操作符注册表
    /// - `source`: 外部操作符来源
    /// - `interval_secs`: 刷新周期（秒）
    pub fn new(
        registry: Arc<OperatorRegistry>,
        source: Arc<dyn ExternalOperatorSource>,
        interval_secs: u64,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            registry,
            source,
            interval: Duration::from_secs(interval_secs),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// 获取关闭句柄；发送 true 后刷新循环退出
    pub fn shutdown_handle(&self) -> watch::Sender<bool> {
        self.shutdown_tx.clone()
    }

    /// 在独立任务中启动刷新循环
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        info!(interval_secs = self.interval.as_secs(), "operator refresh worker started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.registry.refresh_from(self.source.as_ref()).await {
                        // fail-open：保留上一次成功发布的外部操作符，下个周期重试
                        warn!(error = %e, "external operator refresh failed, keeping last known set");
                    }
                }
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("operator refresh worker stopped");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_engine::ContribOperatorSource;

    #[tokio::test]
    async fn test_worker_refreshes_registry() {
        let registry = Arc::new(OperatorRegistry::with_builtins());
        assert!(registry.lookup("LESS_THAN").is_none());

        let worker = OperatorRefreshWorker::new(
            registry.clone(),
            Arc::new(ContribOperatorSource::new()),
            1,
        );
        let shutdown = worker.shutdown_handle();
        let handle = worker.spawn();

        // interval 的第一个 tick 立即到期，启动即完成一次刷新
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(registry.lookup("LESS_THAN").is_some());

        shutdown.send(true).unwrap();
        handle.await.unwrap();
    }
}
