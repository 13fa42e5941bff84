//! 操作符 API 处理器

use axum::extract::State;
use axum::Json;
use rules_engine::OperatorDescriptor;
use std::collections::BTreeMap;

use crate::state::AppState;

/// 返回操作符注册表的只读快照
///
/// GET /api/operators
///
/// 名称到 {numParameters, apply} 的映射，是外部操作符覆盖同名内置
/// 定义之后的生效视图。
pub async fn list_operators(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, OperatorDescriptor>> {
    Json(state.registry.descriptors())
}
