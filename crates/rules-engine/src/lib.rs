//! 规则引擎
//!
//! 将结构化输入记录与声明式规则集进行匹配校验，支持：
//! - JSON 规则树定义和解析
//! - 内置 + 运行期外部扩展的操作符注册表
//! - 迭代式（显式双栈）表达式求值
//! - 规则级独立的批量校验编排

pub mod error;
pub mod evaluator;
pub mod external;
pub mod models;
pub mod operators;
pub mod registry;
pub mod store;
pub mod validator;

pub use error::{Result, RuleError};
pub use evaluator::ExpressionEvaluator;
pub use external::{ContribOperatorSource, ExternalOperatorSource};
pub use models::{EvaluationContext, Operand, Rule, RuleDiagnostic, ValidationReport};
pub use operators::{builtin_operators, Arity, Operator, OperatorDescriptor};
pub use registry::{OperatorRegistry, RegistrySnapshot};
pub use store::RuleStore;
pub use validator::RuleValidator;
