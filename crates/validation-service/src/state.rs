//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use rules_engine::{OperatorRegistry, RuleStore, RuleValidator};
use std::sync::Arc;

/// Axum 应用共享状态
///
/// 规则存储、操作符注册表与校验编排器通过 Arc 在 handler 间共享。
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RuleStore>,
    pub registry: Arc<OperatorRegistry>,
    pub validator: Arc<RuleValidator>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(store: Arc<RuleStore>, registry: Arc<OperatorRegistry>) -> Self {
        let validator = Arc::new(RuleValidator::new(store.clone(), registry.clone()));
        Self {
            store,
            registry,
            validator,
        }
    }
}
