//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// 校验相关路由
fn validation_routes() -> Router<AppState> {
    Router::new().route("/validation", post(handlers::validation::post_validation))
}

/// 规则管理路由
fn rule_routes() -> Router<AppState> {
    Router::new()
        .route("/rules", get(handlers::rule::list_rules))
        .route("/rules", post(handlers::rule::add_rule))
        .route("/rules/{name}", get(handlers::rule::get_rule))
        .route("/rules/{name}", delete(handlers::rule::delete_rule))
}

/// 操作符路由
fn operator_routes() -> Router<AppState> {
    Router::new().route("/operators", get(handlers::operator::list_operators))
}

/// 组装完整的服务路由
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(validation_routes())
        .merge(rule_routes())
        .merge(operator_routes());

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
