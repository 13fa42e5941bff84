//! 输入校验 API 处理器

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use tracing::info;

use crate::dto::ValidationResponse;
use crate::state::AppState;

/// 校验一条输入记录
///
/// POST /api/validation
///
/// 请求体缺失或不是合法 JSON 时按校验失败处理而非传输层错误，
/// 调用方始终拿到确定的 success/failure 结果。
pub async fn post_validation(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<ValidationResponse>) {
    let Ok(Json(input)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ValidationResponse::invalid_input(
                "request body is not valid JSON",
            )),
        );
    };

    let report = state.validator.apply_rules(&input);
    if report.is_success() {
        (StatusCode::OK, Json(ValidationResponse::success()))
    } else {
        info!(
            failed = report.failed_rules.len(),
            structural = report.diagnostics.len(),
            "validation failed"
        );
        (
            StatusCode::BAD_REQUEST,
            Json(ValidationResponse::failure(&report)),
        )
    }
}
