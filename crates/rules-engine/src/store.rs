//! 规则存储
//!
//! 使用 DashMap 提供线程安全的规则缓存。本版本中规则集在启动时从
//! 静态存储一次性装载；对外的增删接口按约定始终报告失败。

use crate::error::{Result, RuleError};
use crate::models::Rule;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 规则存储
#[derive(Clone, Default)]
pub struct RuleStore {
    rules: Arc<DashMap<String, Rule>>,
}

impl RuleStore {
    /// 创建空的规则存储
    pub fn new() -> Self {
        Self {
            rules: Arc::new(DashMap::new()),
        }
    }

    /// 当前存储的规则数量
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 装载一条规则（启动期使用）；同名规则被整体覆盖
    #[instrument(skip(self, rule), fields(rule_name = %rule.name))]
    pub fn load(&self, rule: Rule) -> Result<()> {
        if rule.name.is_empty() {
            return Err(RuleError::Parse("规则名不能为空".to_string()));
        }

        self.rules.insert(rule.name.clone(), rule);
        Ok(())
    }

    /// 从 JSON 文本装载规则数组
    #[instrument(skip(self, json))]
    pub fn load_from_json(&self, json: &str) -> Result<Vec<String>> {
        let rules: Vec<Rule> = serde_json::from_str(json)?;
        self.load_batch(rules)
    }

    /// 批量装载规则
    pub fn load_batch(&self, rules: Vec<Rule>) -> Result<Vec<String>> {
        let mut loaded = Vec::with_capacity(rules.len());
        let mut errors = Vec::new();

        for rule in rules {
            let name = rule.name.clone();
            match self.load(rule) {
                Ok(()) => loaded.push(name),
                Err(e) => errors.push((name, e)),
            }
        }

        if !errors.is_empty() {
            warn!("批量装载部分失败: {:?}", errors);
        }

        info!("规则装载完成: {} 成功, {} 失败", loaded.len(), errors.len());
        Ok(loaded)
    }

    /// 全部规则，按名称排序（稳定顺序，保证校验输出可复现）
    pub fn get_all(&self) -> Vec<Rule> {
        let mut rules: Vec<Rule> = self.rules.iter().map(|r| r.value().clone()).collect();
        rules.sort_by(|a, b| a.name.cmp(&b.name));
        rules
    }

    /// 按名称获取规则
    pub fn get_by_name(&self, name: &str) -> Option<Rule> {
        self.rules.get(name).map(|r| r.clone())
    }

    /// 检查规则是否存在
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// 全部规则名（排序后）
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// 新增规则
    ///
    /// 本版本有意未实现：总是报告失败，调用方不得假定成功。
    pub fn add(&self, _rule: Rule) -> Result<()> {
        Err(RuleError::Unsupported(
            "rule mutation is not implemented in this version",
        ))
    }

    /// 删除规则
    ///
    /// 本版本有意未实现：总是报告失败，调用方不得假定成功。
    pub fn delete(&self, _name: &str) -> Result<()> {
        Err(RuleError::Unsupported(
            "rule mutation is not implemented in this version",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operand;

    fn sample_rule(name: &str) -> Rule {
        Rule::new(
            name,
            Operand::expression(
                "GREATER_THAN",
                vec![
                    Operand::expression("LENGTH", vec![Operand::field("password")]),
                    Operand::literal("3"),
                ],
            ),
        )
    }

    #[test]
    fn test_load_rule() {
        let store = RuleStore::new();
        store.load(sample_rule("password_length")).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.contains("password_length"));
    }

    #[test]
    fn test_load_overwrites_same_name() {
        let store = RuleStore::new();
        store.load(sample_rule("r1")).unwrap();
        store
            .load(Rule::new("r1", Operand::field("other")))
            .unwrap();

        assert_eq!(store.len(), 1);
        let rule = store.get_by_name("r1").unwrap();
        assert!(matches!(rule.rule, Operand::Field { .. }));
    }

    #[test]
    fn test_load_rejects_empty_name() {
        let store = RuleStore::new();
        let result = store.load(sample_rule(""));
        assert!(matches!(result, Err(RuleError::Parse(_))));
    }

    #[test]
    fn test_load_from_json() {
        let store = RuleStore::new();
        let json = r#"
        [
            {
                "name": "password_length",
                "rule": {
                    "operator": "GREATER_THAN",
                    "operands": [
                        {"operator": "LENGTH", "operands": [{"field": "password"}]},
                        {"value": "3"}
                    ]
                }
            },
            {
                "name": "zip_code_pattern",
                "rule": {
                    "operator": "REGEX_MATCH",
                    "operands": [
                        {"value": "^\\d{5}$"},
                        {"field": "address.zip_code"}
                    ]
                }
            }
        ]
        "#;

        let loaded = store.load_from_json(json).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(store.contains("password_length"));
        assert!(store.contains("zip_code_pattern"));
    }

    #[test]
    fn test_load_from_invalid_json() {
        let store = RuleStore::new();
        assert!(store.load_from_json("not json").is_err());
    }

    #[test]
    fn test_get_all_is_sorted_by_name() {
        let store = RuleStore::new();
        store.load(sample_rule("zeta")).unwrap();
        store.load(sample_rule("alpha")).unwrap();
        store.load(sample_rule("mid")).unwrap();

        let names: Vec<String> = store.get_all().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert_eq!(store.names(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_get_nonexistent_rule() {
        let store = RuleStore::new();
        assert!(store.get_by_name("nonexistent").is_none());
    }

    #[test]
    fn test_add_always_fails() {
        let store = RuleStore::new();
        let result = store.add(sample_rule("new_rule"));

        assert!(matches!(result, Err(RuleError::Unsupported(_))));
        assert!(!store.contains("new_rule"));
    }

    #[test]
    fn test_delete_always_fails() {
        let store = RuleStore::new();
        store.load(sample_rule("keep")).unwrap();

        let result = store.delete("keep");

        assert!(matches!(result, Err(RuleError::Unsupported(_))));
        assert!(store.contains("keep"));
    }

    #[test]
    fn test_concurrent_load() {
        use std::thread;

        let store = RuleStore::new();
        let store_clone = store.clone();

        let handle = thread::spawn(move || {
            for i in 0..100 {
                store_clone.load(sample_rule(&format!("rule-{}", i))).unwrap();
            }
        });

        for i in 100..200 {
            store.load(sample_rule(&format!("rule-{}", i))).unwrap();
        }

        handle.join().unwrap();

        assert_eq!(store.len(), 200);
    }
}
