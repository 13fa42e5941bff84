//! 外部操作符来源
//!
//! 外部操作符由内置集合之外的来源提供，按固定周期整体刷新进注册表，
//! 同名定义在查找时覆盖内置操作符。

use crate::error::Result;
use crate::operators::{numeric_compare, Arity, Operator};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// 外部操作符来源抽象
///
/// 不同来源（进程内扩展包、变更较慢的远端配置等）实现此 trait。
/// `fetch` 返回完整的外部操作符映射，注册表以整体替换方式发布，
/// 不做增量合并。
#[async_trait]
pub trait ExternalOperatorSource: Send + Sync {
    async fn fetch(&self) -> Result<HashMap<String, Operator>>;
}

/// 进程内置的扩展操作符包
///
/// 当前提供 LESS_THAN，覆盖运行期新增操作符的完整链路。
#[derive(Debug, Default)]
pub struct ContribOperatorSource;

impl ContribOperatorSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExternalOperatorSource for ContribOperatorSource {
    async fn fetch(&self) -> Result<HashMap<String, Operator>> {
        let less_than = Operator::new(
            "LESS_THAN",
            Arity::Fixed(2),
            "numeric less-than comparison of both operands",
            |args| Ok(Value::Bool(numeric_compare(args, |l, r| l < r))),
        );

        let mut operators = HashMap::new();
        operators.insert(less_than.name().to_string(), less_than);
        Ok(operators)
    }
}
