//! 输入校验服务
//!
//! 将提交的 JSON 记录与声明式规则集进行匹配校验的 REST 服务。

use std::sync::Arc;

use anyhow::Result;
use rules_engine::{ContribOperatorSource, ExternalOperatorSource, OperatorRegistry, RuleStore};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use validation_service::routes;
use validation_service::state::AppState;
use validation_service::worker::OperatorRefreshWorker;
use validation_shared::config::AppConfig;
use validation_shared::observability;

/// 规则文件不可用时使用的内置默认规则集
const DEFAULT_RULES: &str = include_str!("../rules/client_rules.json");

#[tokio::main]
async fn main() -> Result<()> {
    // 统一加载配置：从 config/{service_name}.toml 加载
    let config = AppConfig::load("validation-service").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    observability::init(&config.observability)?;

    info!("Starting validation-service...");

    // 操作符注册表：内置操作符 + 启动时先完成一次外部刷新
    let registry = Arc::new(OperatorRegistry::with_builtins());
    let source: Arc<dyn ExternalOperatorSource> = Arc::new(ContribOperatorSource::new());
    if let Err(e) = registry.refresh_from(source.as_ref()).await {
        warn!(error = %e, "initial external operator refresh failed, starting with built-ins only");
    }

    // 规则存储：从静态规则文件加载，失败时退回内置默认规则集
    let store = Arc::new(RuleStore::new());
    match load_rules(&config.rules.file, &store) {
        Ok(count) => info!(count, file = %config.rules.file, "rules loaded"),
        Err(e) => {
            warn!(
                error = %e,
                file = %config.rules.file,
                "failed to load rule file, falling back to built-in default rules"
            );
            store.load_from_json(DEFAULT_RULES)?;
        }
    }

    // 周期性外部操作符刷新，独立于请求处理
    if config.operators.refresh_enabled {
        OperatorRefreshWorker::new(
            registry.clone(),
            source,
            config.operators.refresh_interval_secs,
        )
        .spawn();
    }

    let state = AppState::new(store, registry);
    let app = routes::router(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("validation-service listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service shutdown complete");
    Ok(())
}

/// 从规则文件装载规则
fn load_rules(path: &str, store: &RuleStore) -> Result<usize> {
    let json = std::fs::read_to_string(path)?;
    let loaded = store.load_from_json(&json)?;
    Ok(loaded.len())
}

/// 优雅关闭信号处理
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        }
    }
}
