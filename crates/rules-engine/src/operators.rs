//! 操作符定义与内置操作符
//!
//! apply 函数收到的操作数已经按声明顺序求值完毕；比较类操作符沿用
//! JavaScript 风格的宽松类型转换。

use crate::error::{Result, RuleError};
use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 操作符参数数量声明
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// 固定参数个数（至少 1）
    Fixed(usize),
    /// 可变参数，至少 1 个操作数
    Variadic,
}

impl Arity {
    /// 实际操作数个数是否满足声明
    pub fn accepts(&self, actual: usize) -> bool {
        match self {
            Self::Fixed(n) => *n == actual,
            Self::Variadic => actual >= 1,
        }
    }

    /// 对外展示的参数个数，变参约定为 -1
    pub fn num_parameters(&self) -> i64 {
        match self {
            Self::Fixed(n) => *n as i64,
            Self::Variadic => -1,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{}", n),
            Self::Variadic => write!(f, "可变(≥1)"),
        }
    }
}

/// apply 函数签名：入参为已求值的操作数序列（声明顺序）
pub type ApplyFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// 具名操作符
#[derive(Clone)]
pub struct Operator {
    name: String,
    arity: Arity,
    /// apply 行为的文字描述，用于操作符列表接口
    summary: String,
    apply: Arc<ApplyFn>,
}

impl Operator {
    pub fn new(
        name: impl Into<String>,
        arity: Arity,
        summary: impl Into<String>,
        apply: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            summary: summary.into(),
            apply: Arc::new(apply),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn apply(&self, args: &[Value]) -> Result<Value> {
        (self.apply)(args)
    }

    /// 只读描述，面向操作符列表接口
    pub fn descriptor(&self) -> OperatorDescriptor {
        OperatorDescriptor {
            num_parameters: self.arity.num_parameters(),
            apply: self.summary.clone(),
        }
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// 操作符的只读描述
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDescriptor {
    pub num_parameters: i64,
    pub apply: String,
}

/// 构建全部内置操作符
pub fn builtin_operators() -> Vec<Operator> {
    vec![
        length(),
        regex_match(),
        equal_to(),
        greater_than(),
        or(),
        and(),
    ]
}

/// LENGTH：字符串的字符数，或集合（数组/对象）的元素个数
fn length() -> Operator {
    Operator::new(
        "LENGTH",
        Arity::Fixed(1),
        "returns the length of a string or the element count of a collection",
        |args| match &args[0] {
            Value::String(s) => Ok(Value::from(s.chars().count() as u64)),
            Value::Array(arr) => Ok(Value::from(arr.len() as u64)),
            Value::Object(obj) => Ok(Value::from(obj.len() as u64)),
            other => Err(RuleError::TypeMismatch {
                expected: "string or collection".to_string(),
                actual: type_name(other).to_string(),
            }),
        },
    )
}

/// REGEX_MATCH：第一个操作数作为正则模式，匹配第二个操作数
fn regex_match() -> Operator {
    // 正则按模式缓存，同一规则集反复求值时避免重复编译
    let cache: Arc<Mutex<HashMap<String, Regex>>> = Arc::new(Mutex::new(HashMap::new()));

    Operator::new(
        "REGEX_MATCH",
        Arity::Fixed(2),
        "compiles operand[0] as a regular expression and tests it against operand[1]",
        move |args| {
            let pattern = args[0].as_str().ok_or_else(|| RuleError::TypeMismatch {
                expected: "string (regex pattern)".to_string(),
                actual: type_name(&args[0]).to_string(),
            })?;

            let subject =
                scalar_to_string(&args[1]).ok_or_else(|| RuleError::TypeMismatch {
                    expected: "scalar".to_string(),
                    actual: type_name(&args[1]).to_string(),
                })?;

            let mut cache = cache.lock();
            if let Some(regex) = cache.get(pattern) {
                return Ok(Value::Bool(regex.is_match(&subject)));
            }

            let regex = Regex::new(pattern).map_err(|e| {
                RuleError::Parse(format!("无效的正则表达式 '{}': {}", pattern, e))
            })?;
            let matched = regex.is_match(&subject);
            cache.insert(pattern.to_string(), regex);
            Ok(Value::Bool(matched))
        },
    )
}

/// EQUAL_TO：按左操作数的类型决定比较方式
///
/// 左侧是字符串时右侧转字符串比较；左侧是数字时右侧转数字比较；
/// 其余情况退化为严格相等。
fn equal_to() -> Operator {
    Operator::new(
        "EQUAL_TO",
        Arity::Fixed(2),
        "equality check; coerces operand[1] to the type of operand[0] when it is a string or number",
        |args| {
            let (left, right) = (&args[0], &args[1]);
            let equal = match left {
                Value::String(l) => scalar_to_string(right).is_some_and(|r| *l == r),
                Value::Number(_) => match (as_f64(left), as_f64(right)) {
                    // 统一转为浮点数比较，避免整数与浮点字面量比较失败
                    (Some(l), Some(r)) => (l - r).abs() < f64::EPSILON,
                    _ => false,
                },
                _ => left == right,
            };
            Ok(Value::Bool(equal))
        },
    )
}

/// GREATER_THAN：两个操作数都转为数字后比较
fn greater_than() -> Operator {
    Operator::new(
        "GREATER_THAN",
        Arity::Fixed(2),
        "numeric greater-than comparison of both operands",
        |args| Ok(Value::Bool(numeric_compare(args, |l, r| l > r))),
    )
}

/// OR：任一操作数为布尔 true 即为 true；非布尔操作数不参与、不转换
fn or() -> Operator {
    Operator::new(
        "OR",
        Arity::Variadic,
        "true iff any operand is boolean true; non-boolean operands are ignored",
        |args| {
            Ok(Value::Bool(
                args.iter().any(|v| matches!(v, Value::Bool(true))),
            ))
        },
    )
}

/// AND：任一操作数为布尔 false 即为 false；非布尔操作数不参与、不转换
fn and() -> Operator {
    Operator::new(
        "AND",
        Arity::Variadic,
        "false iff any operand is boolean false; non-boolean operands are ignored",
        |args| {
            Ok(Value::Bool(
                !args.iter().any(|v| matches!(v, Value::Bool(false))),
            ))
        },
    )
}

/// 数字比较的公共路径
///
/// 任一侧无法转为数字时按 NaN 比较处理，结果为 false 而非报错。
pub(crate) fn numeric_compare<F>(args: &[Value], cmp: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    match (as_f64(&args[0]), as_f64(&args[1])) {
        (Some(l), Some(r)) => cmp(l, r),
        _ => false,
    }
}

/// 尝试将值转换为 f64（数字或可解析的数字字符串）
pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// 将标量值转为字符串；数组和对象不参与字符串比较
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        _ => None,
    }
}

/// 获取值的类型名称
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builtin(name: &str) -> Operator {
        builtin_operators()
            .into_iter()
            .find(|op| op.name() == name)
            .unwrap()
    }

    #[test]
    fn test_length_string() {
        let op = builtin("LENGTH");
        assert_eq!(op.apply(&[json!("bwillis")]).unwrap(), json!(7));
        assert_eq!(op.apply(&[json!("")]).unwrap(), json!(0));
    }

    #[test]
    fn test_length_collections() {
        let op = builtin("LENGTH");
        assert_eq!(op.apply(&[json!(["a", "b", "c"])]).unwrap(), json!(3));
        assert_eq!(op.apply(&[json!({"a": 1, "b": 2})]).unwrap(), json!(2));
    }

    #[test]
    fn test_length_rejects_scalar() {
        let op = builtin("LENGTH");
        let err = op.apply(&[json!(42)]).unwrap_err();
        assert!(matches!(err, RuleError::TypeMismatch { .. }));
    }

    #[test]
    fn test_regex_match() {
        let op = builtin("REGEX_MATCH");
        assert_eq!(
            op.apply(&[json!(r"^\d{5}$"), json!("90067")]).unwrap(),
            json!(true)
        );
        assert_eq!(
            op.apply(&[json!(r"^\d{5}$"), json!("j39jd8j2")]).unwrap(),
            json!(false)
        );
    }

    #[test]
    fn test_regex_match_coerces_subject() {
        let op = builtin("REGEX_MATCH");
        assert_eq!(
            op.apply(&[json!(r"^\d+$"), json!(90067)]).unwrap(),
            json!(true)
        );
    }

    #[test]
    fn test_regex_match_invalid_pattern() {
        let op = builtin("REGEX_MATCH");
        let err = op.apply(&[json!("[invalid"), json!("x")]).unwrap_err();
        assert!(matches!(err, RuleError::Parse(_)));
    }

    #[test]
    fn test_regex_match_non_string_pattern() {
        let op = builtin("REGEX_MATCH");
        let err = op.apply(&[json!(5), json!("x")]).unwrap_err();
        assert!(matches!(err, RuleError::TypeMismatch { .. }));
    }

    #[test]
    fn test_equal_to_string_coercion() {
        let op = builtin("EQUAL_TO");
        assert_eq!(op.apply(&[json!("5"), json!(5)]).unwrap(), json!(true));
        assert_eq!(op.apply(&[json!("true"), json!(true)]).unwrap(), json!(true));
        assert_eq!(op.apply(&[json!("a"), json!("b")]).unwrap(), json!(false));
    }

    #[test]
    fn test_equal_to_number_coercion() {
        let op = builtin("EQUAL_TO");
        assert_eq!(op.apply(&[json!(5), json!("5")]).unwrap(), json!(true));
        assert_eq!(op.apply(&[json!(100), json!(100.0)]).unwrap(), json!(true));
        assert_eq!(op.apply(&[json!(5), json!("abc")]).unwrap(), json!(false));
    }

    #[test]
    fn test_equal_to_strict_fallback() {
        let op = builtin("EQUAL_TO");
        assert_eq!(op.apply(&[json!(true), json!(true)]).unwrap(), json!(true));
        assert_eq!(op.apply(&[json!(true), json!("true")]).unwrap(), json!(false));
        assert_eq!(op.apply(&[json!(null), json!(null)]).unwrap(), json!(true));
    }

    #[test]
    fn test_greater_than() {
        let op = builtin("GREATER_THAN");
        assert_eq!(op.apply(&[json!(10), json!(5)]).unwrap(), json!(true));
        assert_eq!(op.apply(&[json!(5), json!(10)]).unwrap(), json!(false));
        assert_eq!(op.apply(&[json!(5), json!(5)]).unwrap(), json!(false));
    }

    #[test]
    fn test_greater_than_string_coercion() {
        let op = builtin("GREATER_THAN");
        assert_eq!(op.apply(&[json!(10), json!("5")]).unwrap(), json!(true));
        assert_eq!(op.apply(&[json!("7"), json!("10")]).unwrap(), json!(false));
    }

    #[test]
    fn test_greater_than_non_numeric_is_false() {
        // 无法转为数字的操作数按 NaN 比较，结果为 false 而不是错误
        let op = builtin("GREATER_THAN");
        assert_eq!(op.apply(&[json!("abc"), json!(5)]).unwrap(), json!(false));
        assert_eq!(op.apply(&[json!(5), json!(null)]).unwrap(), json!(false));
    }

    #[test]
    fn test_or() {
        let op = builtin("OR");
        assert_eq!(
            op.apply(&[json!(false), json!(true)]).unwrap(),
            json!(true)
        );
        assert_eq!(
            op.apply(&[json!(false), json!(false)]).unwrap(),
            json!(false)
        );
    }

    #[test]
    fn test_or_ignores_non_boolean() {
        let op = builtin("OR");
        // "true" 是字符串，不参与也不转换
        assert_eq!(
            op.apply(&[json!("true"), json!(1)]).unwrap(),
            json!(false)
        );
        assert_eq!(
            op.apply(&[json!("x"), json!(true)]).unwrap(),
            json!(true)
        );
    }

    #[test]
    fn test_and() {
        let op = builtin("AND");
        assert_eq!(op.apply(&[json!(true), json!(true)]).unwrap(), json!(true));
        assert_eq!(
            op.apply(&[json!(true), json!(false)]).unwrap(),
            json!(false)
        );
    }

    #[test]
    fn test_and_ignores_non_boolean() {
        let op = builtin("AND");
        // 没有布尔 false 时结果为 true，即使所有操作数都不是布尔值
        assert_eq!(op.apply(&[json!("false"), json!(0)]).unwrap(), json!(true));
        assert_eq!(
            op.apply(&[json!("x"), json!(false)]).unwrap(),
            json!(false)
        );
    }

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Fixed(2).accepts(2));
        assert!(!Arity::Fixed(2).accepts(3));
        assert!(Arity::Variadic.accepts(1));
        assert!(Arity::Variadic.accepts(10));
        assert!(!Arity::Variadic.accepts(0));
    }

    #[test]
    fn test_descriptor_num_parameters() {
        assert_eq!(builtin("LENGTH").descriptor().num_parameters, 1);
        assert_eq!(builtin("EQUAL_TO").descriptor().num_parameters, 2);
        assert_eq!(builtin("OR").descriptor().num_parameters, -1);
        assert_eq!(builtin("AND").descriptor().num_parameters, -1);
    }

    #[test]
    fn test_descriptor_serialization() {
        let json = serde_json::to_value(builtin("OR").descriptor()).unwrap();
        assert_eq!(json["numParameters"], json!(-1));
        assert!(json["apply"].as_str().unwrap().contains("boolean"));
    }
}
