//! 规则引擎领域模型

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 规则表达式节点
///
/// 反序列化按变体声明顺序匹配（serde untagged），键集分类的优先级固定为
/// Expression > Literal > Field：同时携带 `operator`/`operands` 和 `value`
/// 键的对象会被归类为 Expression。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    /// 子表达式：操作符名 + 有序操作数序列
    Expression {
        operator: String,
        operands: Vec<Operand>,
    },
    /// 字面量。数据模型层面接受任意 JSON 值，求值器要求其必须是字符串
    Literal { value: Value },
    /// 对输入记录的点路径引用，如 "address.zip_code"
    Field { field: String },
}

impl Operand {
    pub fn expression(operator: impl Into<String>, operands: Vec<Operand>) -> Self {
        Self::Expression {
            operator: operator.into(),
            operands,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: Value::String(value.into()),
        }
    }

    pub fn field(path: impl Into<String>) -> Self {
        Self::Field { field: path.into() }
    }
}

/// 规则定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// 规则名，在规则集内唯一
    pub name: String,
    /// 表达式树根节点
    pub rule: Operand,
}

impl Rule {
    pub fn new(name: impl Into<String>, rule: Operand) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

/// 求值上下文 - 提供给规则引擎的输入记录
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    data: Value,
}

impl EvaluationContext {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// 从 JSON 字符串创建
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let data: Value = serde_json::from_str(json)?;
        Ok(Self { data })
    }

    /// 获取字段值（支持点号分隔的路径，如 "address.zip_code"）
    ///
    /// 返回 `None` 当且仅当路径无法解析；字段值本身为 `false` 或 `null`
    /// 时正常返回该值，与"字段缺失"可以区分。
    pub fn get_field(&self, path: &str) -> Option<&Value> {
        let parts: Vec<&str> = path.split('.').collect();
        let mut current = &self.data;

        for part in parts {
            match current {
                Value::Object(map) => {
                    current = map.get(part)?;
                }
                Value::Array(arr) => {
                    // 支持数组索引访问，如 "items.0.name"
                    let index: usize = part.parse().ok()?;
                    current = arr.get(index)?;
                }
                _ => return None,
            }
        }

        Some(current)
    }

    /// 获取底层数据
    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// 单条规则的结构性错误诊断
#[derive(Debug, Clone, Serialize)]
pub struct RuleDiagnostic {
    pub rule: String,
    pub message: String,
}

/// 校验报告
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// 未通过的规则名，按规则名排序（稳定可复现）
    pub failed_rules: Vec<String>,
    /// 结构性错误诊断：规则本身有缺陷，区别于业务上的不通过
    pub diagnostics: Vec<RuleDiagnostic>,
}

impl ValidationReport {
    pub fn is_success(&self) -> bool {
        self.failed_rules.is_empty()
    }
}
