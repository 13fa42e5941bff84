//! 规则 API 处理器
//!
//! 读取接口返回当前规则集；写入接口在本版本中是占位实现，始终报告失败。

use axum::extract::{Path, State};
use axum::Json;
use rules_engine::Rule;

use crate::error::{Result, ServiceError};
use crate::state::AppState;

/// 返回系统中当前的全部规则
///
/// GET /api/rules
pub async fn list_rules(State(state): State<AppState>) -> Json<Vec<Rule>> {
    Json(state.store.get_all())
}

/// 按名称返回单条规则
///
/// GET /api/rules/{name}
pub async fn get_rule(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Rule>> {
    state
        .store
        .get_by_name(&name)
        .map(Json)
        .ok_or(ServiceError::RuleNotFound(name))
}

/// 新增规则（占位，始终报告失败）
///
/// POST /api/rules
pub async fn add_rule(State(state): State<AppState>, Json(rule): Json<Rule>) -> Result<()> {
    state.store.add(rule)?;
    Ok(())
}

/// 删除规则（占位，始终报告失败）
///
/// DELETE /api/rules/{name}
pub async fn delete_rule(State(state): State<AppState>, Path(name): Path<String>) -> Result<()> {
    state.store.delete(&name)?;
    Ok(())
}
