//! 依赖注入容器
//!
//! 容器持有自己的绑定注册表和不可变的父容器列表。绑定先以草稿形式进入
//! 待处理队列，在下一次绑定或解析调用时“刷新”进注册表。

use crate::builder::{BindingBuilder, InterfacesBuilder};
use crate::hierarchy;
use crate::record::{BindingDraft, BindingRecord, BindingTarget, Contract};
use crate::registry::BindingRegistry;
use di_abstractions::{
    identity_cast, BindingKey, Capabilities, Constructor, ContainerConfig, ContainerStats,
    DependencyError, DependencyResult, Identifier, Injectable, Instance, Lifetime, TypeInfo,
};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// 依赖注入容器
///
/// `DiContainer` 是一个可克隆的句柄，克隆得到的是同一个容器。
/// 父容器在创建时确定，之后不再改变。
///
/// # Examples
///
/// ```
/// use di_impl::DiContainer;
///
/// let parent = DiContainer::new();
/// let child = DiContainer::with_parents([parent.clone()]);
///
/// parent.bind_instance("parent".to_string())?;
/// assert_eq!(*child.resolve::<String>()?, "parent");
///
/// child.bind_instance("child".to_string())?;
/// assert_eq!(*child.resolve::<String>()?, "child");
/// assert_eq!(child.resolve_all::<String>()?.len(), 2);
/// # Ok::<(), di_abstractions::DependencyError>(())
/// ```
#[derive(Clone)]
pub struct DiContainer {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    id: u64,
    parents: Vec<DiContainer>,
    config: ContainerConfig,
    state: RwLock<ContainerState>,
    stats: StatsCounters,
}

#[derive(Default)]
struct StatsCounters {
    resolutions: AtomicUsize,
    instances_created: AtomicUsize,
    resolution_errors: AtomicUsize,
}

#[derive(Default)]
struct ContainerState {
    registry: BindingRegistry,
    pending: Vec<BindingDraft>,
    single_marks: HashMap<BindingKey, SingleMark>,
}

/// 某个键曾经以 Single 作用域登记过
///
/// 解绑不会清除标记。
#[derive(Debug, Default)]
struct SingleMark {
    conflict_reported: bool,
}

impl ContainerState {
    /// 草稿中与已登记 Single 绑定重复的键
    fn duplicate_single(&self, draft: &BindingDraft) -> Option<BindingKey> {
        if draft.lifetime != Lifetime::Single {
            return None;
        }
        draft.keys().find(|key| self.single_marks.contains_key(key))
    }

    fn register(&mut self, draft: BindingDraft) -> usize {
        if draft.lifetime == Lifetime::Single {
            for key in draft.keys() {
                self.single_marks.insert(key, SingleMark::default());
            }
        }
        let records = draft.into_records();
        let count = records.len();
        for record in records {
            self.registry.add(record);
        }
        count
    }
}

impl DiContainer {
    /// 创建没有父容器的容器
    pub fn new() -> Self {
        Self::with_config(Vec::<Self>::new(), ContainerConfig::default())
    }

    /// 创建带父容器的容器，父容器顺序即解析顺序
    pub fn with_parents(parents: impl IntoIterator<Item = Self>) -> Self {
        Self::with_config(parents, ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(parents: impl IntoIterator<Item = Self>, config: ContainerConfig) -> Self {
        let inner = ContainerInner {
            id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
            parents: parents.into_iter().collect(),
            config,
            state: RwLock::new(ContainerState::default()),
            stats: StatsCounters::default(),
        };
        debug!(container = inner.id, parents = inner.parents.len(), "创建容器");
        Self {
            inner: Arc::new(inner),
        }
    }

    /// 以当前容器为唯一父容器创建子容器，沿用当前配置
    pub fn create_sub_container(&self) -> Self {
        Self::with_config([self.clone()], self.inner.config.clone())
    }

    /// 容器标识
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    /// 直接父容器
    pub fn parent_containers(&self) -> &[Self] {
        &self.inner.parents
    }

    /// 全部祖先容器（广度优先，不去重）
    pub fn ancestor_containers(&self) -> Vec<Self> {
        hierarchy::ancestors(&self.inner.parents)
    }

    /// 统计信息快照
    pub fn stats(&self) -> ContainerStats {
        let stats = &self.inner.stats;
        ContainerStats {
            registered_bindings: self.inner.state.read().registry.len(),
            resolutions: stats.resolutions.load(Ordering::Relaxed),
            instances_created: stats.instances_created.load(Ordering::Relaxed),
            resolution_errors: stats.resolution_errors.load(Ordering::Relaxed),
        }
    }

    // ---- 绑定 ----

    /// 绑定 `K`，默认目标为构造 `K` 本身
    pub fn bind<K: Injectable>(&self) -> DependencyResult<BindingBuilder<K>> {
        self.flush()?;
        Ok(BindingBuilder::new(
            self.clone(),
            Some(BindingTarget::Construct(Constructor::of::<K>())),
        ))
    }

    /// 绑定契约类型 `K`（可以是 `dyn Trait`），目标由 `to`/`to_instance` 指定
    ///
    /// 没有指定目标的绑定在提交时被丢弃。
    pub fn bind_contract<K>(&self) -> DependencyResult<BindingBuilder<K>>
    where
        K: ?Sized + Send + Sync + 'static,
    {
        self.flush()?;
        Ok(BindingBuilder::new(self.clone(), None))
    }

    /// 绑定字面实例
    pub fn bind_instance<T: Send + Sync + 'static>(
        &self,
        value: T,
    ) -> DependencyResult<BindingBuilder<T>> {
        self.bind_contract::<T>()
            .map(|builder| builder.to_instance(value))
    }

    /// 逐个绑定实例，每个实例以其运行时类型为键
    pub fn bind_instances(&self, values: impl IntoIterator<Item = Instance>) -> DependencyResult<()> {
        self.flush()?;
        for instance in values {
            let contract = Contract {
                type_info: instance.type_info(),
                cast: identity_cast,
            };
            self.commit(BindingDraft::new(
                vec![contract],
                Some(BindingTarget::Instance(instance)),
            ));
        }
        Ok(())
    }

    /// 把 `C` 实现的全部接口绑定到 `C`，这些绑定共享一个缓存槽
    pub fn bind_interfaces_to<C>(&self) -> DependencyResult<InterfacesBuilder>
    where
        C: Injectable + Capabilities,
    {
        self.bind_capabilities::<C>(false)
    }

    /// 同 [`bind_interfaces_to`](Self::bind_interfaces_to)，并且绑定 `C` 自身
    pub fn bind_interfaces_and_self_to<C>(&self) -> DependencyResult<InterfacesBuilder>
    where
        C: Injectable + Capabilities,
    {
        self.bind_capabilities::<C>(true)
    }

    fn bind_capabilities<C>(&self, include_self: bool) -> DependencyResult<InterfacesBuilder>
    where
        C: Injectable + Capabilities,
    {
        self.flush()?;
        let mut contracts = Vec::new();
        if include_self {
            contracts.push(Contract {
                type_info: TypeInfo::of::<C>(),
                cast: identity_cast,
            });
        }
        contracts.extend(C::capabilities().into_iter().map(|capability| Contract {
            type_info: capability.type_info,
            cast: capability.cast,
        }));
        Ok(InterfacesBuilder::new(
            self.clone(),
            BindingDraft::new(
                contracts,
                Some(BindingTarget::Construct(Constructor::of::<C>())),
            ),
        ))
    }

    /// 解绑后重新绑定 `K`
    pub fn rebind<K: Injectable>(&self) -> DependencyResult<BindingBuilder<K>> {
        self.unbind::<K>();
        self.bind::<K>()
    }

    /// 解绑指定标识符后重新绑定 `K`（沿用该标识符）
    pub fn rebind_id<K: Injectable>(
        &self,
        identifier: impl Into<Identifier>,
    ) -> DependencyResult<BindingBuilder<K>> {
        let identifier = identifier.into();
        self.unbind_id::<K>(identifier.clone());
        self.bind::<K>().map(|builder| builder.with_id(identifier))
    }

    /// 解绑后重新绑定契约类型 `K`
    pub fn rebind_contract<K>(&self) -> DependencyResult<BindingBuilder<K>>
    where
        K: ?Sized + Send + Sync + 'static,
    {
        self.unbind::<K>();
        self.bind_contract::<K>()
    }

    // ---- 解绑 ----

    /// 删除本容器中 `T` 的全部绑定（任意标识符），返回删除数量
    pub fn unbind<T: ?Sized + 'static>(&self) -> usize {
        let type_id = TypeId::of::<T>();
        self.remove_bindings(
            &format!("{}", TypeInfo::of::<T>()),
            |key| key.type_info.id == type_id,
            |registry| registry.remove_type(type_id),
        )
    }

    /// 删除本容器中 `T` 带指定标识符的绑定，返回删除数量
    pub fn unbind_id<T: ?Sized + 'static>(&self, identifier: impl Into<Identifier>) -> usize {
        let key = BindingKey::new(TypeInfo::of::<T>(), Some(identifier.into()));
        self.remove_bindings(
            &key.to_string(),
            |candidate| candidate == &key,
            |registry| registry.remove_key(&key),
        )
    }

    /// 清空本容器的全部绑定，不影响父容器
    pub fn unbind_all(&self) -> usize {
        self.remove_bindings("*", |_| true, BindingRegistry::clear)
    }

    fn remove_bindings(
        &self,
        label: &str,
        matches: impl Fn(&BindingKey) -> bool,
        remove: impl FnOnce(&mut BindingRegistry) -> usize,
    ) -> usize {
        self.flush_deferred();
        let mut state = self.inner.state.write();
        state
            .pending
            .retain_mut(|draft| !draft.remove_contracts(&matches));
        let removed = remove(&mut state.registry);
        debug!(container = self.inner.id, target = label, removed, "解绑");
        removed
    }

    // ---- 刷新 ----

    pub(crate) fn commit(&self, draft: BindingDraft) {
        if draft.target.is_none() {
            warn!(
                container = self.inner.id,
                keys = ?draft.keys().collect::<Vec<_>>(),
                "绑定没有指定目标，已忽略"
            );
            return;
        }
        debug!(
            container = self.inner.id,
            keys = ?draft.keys().collect::<Vec<_>>(),
            lifetime = %draft.lifetime,
            "提交绑定"
        );
        self.inner.state.write().pending.push(draft);
    }

    /// 把待处理的绑定登记进注册表
    ///
    /// 同一键的重复 Single 绑定第一次出现时返回 `BindingConflict` 并丢弃该草稿，
    /// 队列中其后的草稿留到下一次刷新，因此每个键的冲突都会被报告一次。
    /// 冲突报告过之后再出现的重复绑定直接丢弃，解析使用最早登记的那一条。
    pub(crate) fn flush(&self) -> DependencyResult<()> {
        if self.inner.state.read().pending.is_empty() {
            return Ok(());
        }

        let mut state = self.inner.state.write();
        let mut drafts = std::mem::take(&mut state.pending).into_iter();
        while let Some(draft) = drafts.next() {
            let Some(key) = state.duplicate_single(&draft) else {
                let records = state.register(draft);
                debug!(container = self.inner.id, records, "登记绑定");
                continue;
            };
            let mark = state.single_marks.entry(key.clone()).or_default();
            if mark.conflict_reported {
                warn!(key = %key, "丢弃重复的 Single 绑定（冲突已报告过）");
                continue;
            }
            mark.conflict_reported = true;
            state.pending.extend(drafts);
            return Err(DependencyError::BindingConflict {
                type_name: key.type_info.short_name(),
                identifier: key.identifier_label(),
            });
        }
        Ok(())
    }

    /// 登记不冲突的草稿，重复的 Single 绑定留在队列里等待报告
    pub(crate) fn flush_deferred(&self) {
        if self.inner.state.read().pending.is_empty() {
            return;
        }

        let mut state = self.inner.state.write();
        for draft in std::mem::take(&mut state.pending) {
            if state.duplicate_single(&draft).is_some() {
                state.pending.push(draft);
            } else {
                let records = state.register(draft);
                debug!(container = self.inner.id, records, "登记绑定");
            }
        }
    }

    /// 本容器中精确匹配 `key` 的记录
    pub(crate) fn local_records(&self, key: &BindingKey) -> Vec<Arc<BindingRecord>> {
        self.flush_deferred();
        self.inner.state.read().registry.lookup(key).to_vec()
    }

    pub(crate) fn note_resolution(&self) {
        self.inner.stats.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn note_instance_created(&self) {
        self.inner
            .stats
            .instances_created
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn note_resolution_error(&self) {
        self.inner
            .stats
            .resolution_errors
            .fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for DiContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for DiContainer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for DiContainer {}

impl fmt::Debug for DiContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiContainer")
            .field("id", &self.inner.id)
            .field(
                "parents",
                &self.inner.parents.iter().map(Self::id).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
