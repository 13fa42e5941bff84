//! 校验服务响应 DTO 定义

use rules_engine::ValidationReport;
use serde::Serialize;

/// 校验结果响应
///
/// result 为 "success" 或 "failure"；失败时 rules 列出未通过的规则名。
/// 出现结构性错误时 message 附带诊断信息，与业务失败名单相互区分。
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResponse {
    pub fn success() -> Self {
        Self {
            result: "success",
            rules: None,
            message: None,
        }
    }

    pub fn failure(report: &ValidationReport) -> Self {
        let message = if report.diagnostics.is_empty() {
            None
        } else {
            Some(
                report
                    .diagnostics
                    .iter()
                    .map(|d| format!("{}: {}", d.rule, d.message))
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        };

        Self {
            result: "failure",
            rules: Some(report.failed_rules.clone()),
            message,
        }
    }

    /// 请求体本身无法作为输入记录时的失败响应
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            result: "failure",
            rules: None,
            message: Some(message.into()),
        }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub rules: usize,
    pub operators: usize,
}
