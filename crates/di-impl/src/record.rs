//! 绑定记录

use crate::scope::ScopeSlot;
use di_abstractions::{
    BindingKey, CastFn, Constructor, Identifier, Instance, Lifetime, TypeInfo,
};
use std::fmt;
use std::sync::Arc;

/// 绑定目标：如何得到具体实例
#[derive(Debug, Clone)]
pub enum BindingTarget {
    /// 字面实例，忽略作用域
    Instance(Instance),
    /// 构造具体类型
    Construct(Constructor),
    /// 在同一容器中解析另一个键并复用其结果
    FromResolve(BindingKey),
}

/// 绑定记录
///
/// 只属于创建它的容器；键在创建后不再改变。
pub struct BindingRecord {
    pub(crate) key: BindingKey,
    pub(crate) target: BindingTarget,
    pub(crate) lifetime: Lifetime,
    pub(crate) arguments: Vec<Instance>,
    pub(crate) cast: CastFn,
    pub(crate) slot: Arc<ScopeSlot>,
    pub(crate) sequence: u64,
}

impl BindingRecord {
    /// 用于查找的键
    pub const fn key(&self) -> &BindingKey {
        &self.key
    }

    /// 作用域
    pub const fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// 显式构造参数
    pub fn arguments(&self) -> &[Instance] {
        &self.arguments
    }
}

impl fmt::Debug for BindingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRecord")
            .field("key", &self.key)
            .field("target", &self.target)
            .field("lifetime", &self.lifetime)
            .field("arguments", &self.arguments.len())
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

/// 一个契约类型及其转换
#[derive(Debug, Clone, Copy)]
pub(crate) struct Contract {
    pub(crate) type_info: TypeInfo,
    pub(crate) cast: CastFn,
}

/// 尚未登记的绑定
///
/// 构建器在释放时把草稿提交到容器的待处理队列，容器在下一次刷新时
/// 把它展开为每个契约类型一条记录，这些记录共享同一个缓存槽。
#[derive(Debug)]
pub(crate) struct BindingDraft {
    pub(crate) contracts: Vec<Contract>,
    pub(crate) identifier: Option<Identifier>,
    pub(crate) target: Option<BindingTarget>,
    pub(crate) lifetime: Lifetime,
    pub(crate) arguments: Vec<Instance>,
}

impl BindingDraft {
    pub(crate) fn new(contracts: Vec<Contract>, target: Option<BindingTarget>) -> Self {
        Self {
            contracts,
            identifier: None,
            target,
            lifetime: Lifetime::default(),
            arguments: Vec::new(),
        }
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = BindingKey> + '_ {
        self.contracts
            .iter()
            .map(|contract| BindingKey::new(contract.type_info, self.identifier.clone()))
    }

    /// 移除键满足条件的契约，返回剩余契约是否为空
    pub(crate) fn remove_contracts(&mut self, matches: impl Fn(&BindingKey) -> bool) -> bool {
        let identifier = self.identifier.clone();
        self.contracts
            .retain(|contract| !matches(&BindingKey::new(contract.type_info, identifier.clone())));
        self.contracts.is_empty()
    }

    /// 展开为记录；没有目标的草稿不产生记录
    pub(crate) fn into_records(self) -> Vec<BindingRecord> {
        let Some(target) = self.target else {
            return Vec::new();
        };
        let slot = Arc::new(ScopeSlot::new());
        self.contracts
            .into_iter()
            .map(|contract| BindingRecord {
                key: BindingKey::new(contract.type_info, self.identifier.clone()),
                target: target.clone(),
                lifetime: self.lifetime,
                arguments: self.arguments.clone(),
                cast: contract.cast,
                slot: Arc::clone(&slot),
                sequence: 0,
            })
            .collect()
    }
}
