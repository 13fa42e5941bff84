//! 校验编排器
//!
//! 将当前规则集逐条应用到输入记录并汇总未通过的规则名。单条规则的
//! 结构性缺陷只会让该条规则记为失败，不会中断整批校验。

use crate::evaluator::ExpressionEvaluator;
use crate::models::{EvaluationContext, RuleDiagnostic, ValidationReport};
use crate::registry::OperatorRegistry;
use crate::store::RuleStore;
use serde_json::Value;
use std::sync::Arc;
use tracing::{instrument, warn};

/// 校验编排器
pub struct RuleValidator {
    store: Arc<RuleStore>,
    evaluator: ExpressionEvaluator,
}

impl RuleValidator {
    pub fn new(store: Arc<RuleStore>, registry: Arc<OperatorRegistry>) -> Self {
        Self {
            store,
            evaluator: ExpressionEvaluator::new(registry),
        }
    }

    /// 将当前规则集应用到一条输入记录
    ///
    /// 规则按名称顺序求值；求值状态（工作栈/值栈）是每次求值调用的
    /// 局部量，规则之间、并发调用之间互不影响。失败名单在本次调用的
    /// 报告里聚合，不经过任何共享可变状态。
    #[instrument(skip(self, input))]
    pub fn apply_rules(&self, input: &Value) -> ValidationReport {
        let context = EvaluationContext::new(input.clone());
        let mut failed_rules = Vec::new();
        let mut diagnostics = Vec::new();

        for rule in self.store.get_all() {
            match self.evaluator.evaluate(&rule.rule, &context) {
                Ok(true) => {}
                Ok(false) => failed_rules.push(rule.name),
                Err(e) => {
                    warn!(rule = %rule.name, error = %e, "规则结构有缺陷，按未通过处理");
                    diagnostics.push(RuleDiagnostic {
                        rule: rule.name.clone(),
                        message: e.to_string(),
                    });
                    failed_rules.push(rule.name);
                }
            }
        }

        ValidationReport {
            failed_rules,
            diagnostics,
        }
    }
}
