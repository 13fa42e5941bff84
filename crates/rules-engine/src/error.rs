//! 规则引擎错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("规则解析失败: {0}")]
    Parse(String),

    #[error("未知操作符: {0}")]
    UnknownOperator(String),

    #[error("操作符 {operator} 参数数量不匹配: 期望 {expected}, 实际 {actual}")]
    ArityMismatch {
        operator: String,
        expected: String,
        actual: usize,
    },

    #[error("类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("字段不存在: {0}")]
    FieldNotFound(String),

    #[error("值栈元素不足: 操作符 {operator} 需要 {needed} 个值, 当前只有 {available} 个")]
    StackUnderflow {
        operator: String,
        needed: usize,
        available: usize,
    },

    #[error("表达式归约失败: 求值结束后值栈中剩余 {remaining} 个值")]
    Reduction { remaining: usize },

    #[error("规则未找到: {0}")]
    RuleNotFound(String),

    #[error("操作不支持: {0}")]
    Unsupported(&'static str),

    #[error("外部操作符刷新失败: {0}")]
    Refresh(String),

    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RuleError>;
