//! 表达式求值器
//!
//! 用显式的工作栈/值栈对规则树做迭代式后序归约：辅助空间 O(树大小)，
//! 不随嵌套深度消耗调用栈，深层嵌套的规则也能安全求值。
//!
//! OR/AND 的短路只发生在操作符的 apply 内部；所有操作数都会先被求值
//! （单趟迭代模型的取舍，真正的短路需要把操作数求值改为惰性）。

use crate::error::{Result, RuleError};
use crate::models::{EvaluationContext, Operand};
use crate::operators::type_name;
use crate::registry::OperatorRegistry;
use serde_json::Value;
use std::sync::Arc;

/// 工作栈条目：待处理的节点，或子节点求值完毕后触发归约的操作符标记
enum WorkItem<'a> {
    Node(&'a Operand),
    /// 归约标记：从值栈弹出 `argc` 个已求值的操作数并调用操作符
    Apply { operator: &'a str, argc: usize },
}

/// 表达式求值器
pub struct ExpressionEvaluator {
    registry: Arc<OperatorRegistry>,
}

impl ExpressionEvaluator {
    pub fn new(registry: Arc<OperatorRegistry>) -> Self {
        Self { registry }
    }

    /// 求值一棵规则树，归约为单个布尔值
    ///
    /// 两个栈都是本次调用的局部变量：规则之间、并发调用之间不共享任何
    /// 可变状态。操作符查找使用进入时取得的注册表快照，整个求值过程
    /// 看到同一份一致的操作符集合。
    pub fn evaluate(&self, root: &Operand, context: &EvaluationContext) -> Result<bool> {
        let snapshot = self.registry.snapshot();
        let mut work: Vec<WorkItem<'_>> = vec![WorkItem::Node(root)];
        let mut values: Vec<Value> = Vec::new();

        while let Some(item) = work.pop() {
            match item {
                WorkItem::Node(Operand::Expression { operator, operands }) => {
                    work.push(WorkItem::Apply {
                        operator: operator.as_str(),
                        argc: operands.len(),
                    });
                    // 子节点按声明顺序压栈、逆序弹出求值；归约时从值栈再次
                    // 逆序弹出，两次反转后操作数按声明顺序到达操作符。
                    // EQUAL_TO/GREATER_THAN/REGEX_MATCH 等顺序敏感的操作符
                    // 依赖这一保证。
                    for child in operands {
                        work.push(WorkItem::Node(child));
                    }
                }
                WorkItem::Node(Operand::Literal { value }) => match value {
                    Value::String(_) => values.push(value.clone()),
                    other => {
                        return Err(RuleError::TypeMismatch {
                            expected: "string literal".to_string(),
                            actual: type_name(other).to_string(),
                        });
                    }
                },
                WorkItem::Node(Operand::Field { field }) => {
                    let resolved = context
                        .get_field(field)
                        .ok_or_else(|| RuleError::FieldNotFound(field.clone()))?;
                    values.push(resolved.clone());
                }
                WorkItem::Apply { operator, argc } => {
                    let op = snapshot
                        .lookup(operator)
                        .ok_or_else(|| RuleError::UnknownOperator(operator.to_string()))?;

                    if !op.arity().accepts(argc) {
                        return Err(RuleError::ArityMismatch {
                            operator: operator.to_string(),
                            expected: op.arity().to_string(),
                            actual: argc,
                        });
                    }
                    if values.len() < argc {
                        return Err(RuleError::StackUnderflow {
                            operator: operator.to_string(),
                            needed: argc,
                            available: values.len(),
                        });
                    }

                    let mut args = values.split_off(values.len() - argc);
                    args.reverse();
                    values.push(op.apply(&args)?);
                }
            }
        }

        // 终止条件：值栈必须恰好剩下一个布尔值
        if values.len() != 1 {
            return Err(RuleError::Reduction {
                remaining: values.len(),
            });
        }
        match values.remove(0) {
            Value::Bool(b) => Ok(b),
            other => Err(RuleError::TypeMismatch {
                expected: "boolean".to_string(),
                actual: type_name(&other).to_string(),
            }),
        }
    }
}
