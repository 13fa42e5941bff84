//! 操作符注册表
//!
//! 内置操作符在构建期注册完毕后只读；外部操作符子集以 copy-on-write
//! 快照方式整体发布，刷新与在途求值并发进行且互不阻塞。

use crate::error::{Result, RuleError};
use crate::external::ExternalOperatorSource;
use crate::operators::{builtin_operators, Operator, OperatorDescriptor};
use arc_swap::ArcSwap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, instrument};

/// 操作符注册表
pub struct OperatorRegistry {
    /// 内置操作符，构建完成后只读
    builtins: HashMap<String, Operator>,
    /// 外部操作符，每次刷新整体替换；查找时同名覆盖内置定义
    external: ArcSwap<HashMap<String, Operator>>,
}

impl OperatorRegistry {
    /// 创建空注册表
    pub fn empty() -> Self {
        Self {
            builtins: HashMap::new(),
            external: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// 创建携带全部内置操作符的注册表
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for op in builtin_operators() {
            registry.register(op);
        }
        registry
    }

    /// 注册（或按名覆盖）一个内置操作符
    ///
    /// 覆盖是有意行为，不报错；注册发生在注册表发布共享之前。
    pub fn register(&mut self, operator: Operator) {
        self.builtins.insert(operator.name().to_string(), operator);
    }

    /// 查找操作符；外部定义优先于同名内置定义
    pub fn lookup(&self, name: &str) -> Option<Operator> {
        let external = self.external.load();
        external
            .get(name)
            .or_else(|| self.builtins.get(name))
            .cloned()
    }

    /// 获取一次性读快照
    ///
    /// 单次求值全程使用同一快照，刷新不会改变已发布的映射，
    /// 因此在途求值看到的操作符集合始终一致。
    pub fn snapshot(&self) -> RegistrySnapshot<'_> {
        RegistrySnapshot {
            builtins: &self.builtins,
            external: self.external.load_full(),
        }
    }

    /// 从外部来源拉取操作符并整体替换外部子集
    ///
    /// 拉取失败时保留上一次成功发布的外部操作符，只令本次刷新失败，
    /// 不影响任何在途求值。
    #[instrument(skip(self, source))]
    pub async fn refresh_from(&self, source: &dyn ExternalOperatorSource) -> Result<usize> {
        let fetched = source.fetch().await.map_err(|e| match e {
            RuleError::Refresh(_) => e,
            other => RuleError::Refresh(other.to_string()),
        })?;

        let count = fetched.len();
        self.external.store(Arc::new(fetched));
        info!(count, "外部操作符已刷新");
        Ok(count)
    }

    /// 当前生效操作符的只读描述（外部覆盖内置后合并，按名排序）
    pub fn descriptors(&self) -> BTreeMap<String, OperatorDescriptor> {
        let mut out: BTreeMap<String, OperatorDescriptor> = self
            .builtins
            .iter()
            .map(|(name, op)| (name.clone(), op.descriptor()))
            .collect();

        for (name, op) in self.external.load().iter() {
            out.insert(name.clone(), op.descriptor());
        }

        out
    }

    /// 当前生效的操作符个数（外部与内置同名的只计一次）
    pub fn len(&self) -> usize {
        let external = self.external.load();
        let extra = external
            .keys()
            .filter(|name| !self.builtins.contains_key(*name))
            .count();
        self.builtins.len() + extra
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// 注册表读快照：一次求值期间保持一致的操作符视图
pub struct RegistrySnapshot<'a> {
    builtins: &'a HashMap<String, Operator>,
    external: Arc<HashMap<String, Operator>>,
}

impl RegistrySnapshot<'_> {
    pub fn lookup(&self, name: &str) -> Option<&Operator> {
        self.external
            .get(name)
            .or_else(|| self.builtins.get(name))
    }
}
