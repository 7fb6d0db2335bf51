//! 实例解析
//!
//! 本地绑定遮蔽祖先绑定；本地没有匹配时按层向上查找，第一层出现匹配即停止。
//! 同一层的多个父容器视为一个整体，合计两个以上匹配即为多重匹配。

use crate::container::DiContainer;
use crate::hierarchy::AncestorLevels;
use crate::record::{BindingRecord, BindingTarget};
use crate::wiring;
use di_abstractions::{
    BindingKey, Dependency, DependencyError, DependencyResult, Identifier, Instance,
    InstanceResolver, ResolveContext, ResolveOptions,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// 匹配到的记录及其所属容器
type Candidate = (DiContainer, Arc<BindingRecord>);

impl DiContainer {
    fn candidates_in(container: &Self, key: &BindingKey) -> Vec<Candidate> {
        container
            .local_records(key)
            .into_iter()
            .map(|record| (container.clone(), record))
            .collect()
    }

    fn find_one(&self, key: &BindingKey) -> DependencyResult<Candidate> {
        let local = Self::candidates_in(self, key);
        let levels = std::iter::once(local).chain(
            AncestorLevels::new(self.parent_containers()).map(|level| {
                level
                    .iter()
                    .flat_map(|container| Self::candidates_in(container, key))
                    .collect()
            }),
        );

        for mut matches in levels {
            match matches.len() {
                0 => continue,
                1 => {
                    if let Some(candidate) = matches.pop() {
                        return Ok(candidate);
                    }
                }
                candidates => {
                    return Err(DependencyError::AmbiguousMatch {
                        type_name: key.type_info.short_name(),
                        identifier: key.identifier_label(),
                        candidates,
                    });
                }
            }
        }

        Err(DependencyError::unresolvable(
            key.type_info.short_name(),
            key.identifier_label(),
        ))
    }

    fn find_all(&self, key: &BindingKey) -> Vec<Candidate> {
        let mut matches = Self::candidates_in(self, key);
        for level in AncestorLevels::new(self.parent_containers()) {
            for container in &level {
                matches.extend(Self::candidates_in(container, key));
            }
        }
        matches
    }

    /// 按作用域取得记录的实例并转换为键类型
    fn instantiate(
        &self,
        record: &BindingRecord,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        let cached = record.lifetime.is_cached()
            && !matches!(record.target, BindingTarget::Instance(_));
        if cached {
            if let Some(hit) = record.slot.get() {
                trace!(container = self.id(), key = %record.key, "命中缓存");
                return (record.cast)(&hit);
            }
        }

        let created = self.create(record, context)?;
        let concrete = if cached {
            record.slot.get_or_store(created)
        } else {
            created
        };
        (record.cast)(&concrete)
    }

    fn create(
        &self,
        record: &BindingRecord,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        match &record.target {
            BindingTarget::Instance(instance) => Ok(instance.clone()),
            BindingTarget::FromResolve(source) => {
                trace!(container = self.id(), key = %record.key, source = %source, "转发解析");
                self.resolve_key(source, context)
            }
            BindingTarget::Construct(constructor) => {
                let instance = wiring::construct(self, context, constructor, &record.arguments)?;
                self.note_instance_created();
                trace!(
                    container = self.id(),
                    key = %record.key,
                    concrete = %constructor.concrete,
                    lifetime = %record.lifetime,
                    "创建实例"
                );
                Ok(instance)
            }
        }
    }

    /// 报告型刷新后建立解析上下文
    fn begin_resolution(&self) -> DependencyResult<ResolveContext> {
        self.flush()?;
        Ok(ResolveContext::new(ResolveOptions::from(self.config())))
    }

    fn finish_resolution<T>(
        &self,
        key: &BindingKey,
        result: DependencyResult<T>,
    ) -> DependencyResult<T> {
        self.note_resolution();
        if let Err(err) = &result {
            self.note_resolution_error();
            debug!(container = self.id(), key = %key, error = %err, "解析失败");
        }
        result
    }

    fn resolve_one_typed<T>(&self, key: BindingKey) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let result = self.begin_resolution().and_then(|mut context| {
            self.resolve_key(&key, &mut context)?.downcast::<T>()
        });
        self.finish_resolution(&key, result)
    }

    fn resolve_all_typed<T>(&self, key: BindingKey) -> DependencyResult<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let result = self.begin_resolution().and_then(|mut context| {
            self.resolve_all_keys(&key, &mut context)?
                .iter()
                .map(Instance::downcast::<T>)
                .collect()
        });
        self.finish_resolution(&key, result)
    }

    /// 解析恰好一个 `T`（只匹配不带标识符的绑定）
    ///
    /// 零个匹配返回 `Unresolvable`，决定层上两个以上匹配返回 `AmbiguousMatch`。
    pub fn resolve<T>(&self) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_one_typed(BindingKey::of::<T>())
    }

    /// 解析恰好一个带指定标识符的 `T`
    pub fn resolve_id<T>(&self, identifier: impl Into<Identifier>) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_one_typed(BindingKey::with_id::<T>(identifier))
    }

    /// 解析本容器和全部祖先中的所有 `T`，本地在前，之后逐层；没有匹配时为空
    ///
    /// 菱形继承中经多条路径到达的祖先只搜索一次，其绑定只出现一次。
    pub fn resolve_all<T>(&self) -> DependencyResult<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_all_typed(BindingKey::of::<T>())
    }

    /// 同 [`resolve_all`](Self::resolve_all)，只匹配带指定标识符的绑定
    pub fn resolve_id_all<T>(
        &self,
        identifier: impl Into<Identifier>,
    ) -> DependencyResult<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_all_typed(BindingKey::with_id::<T>(identifier))
    }

    /// 解析 `Vec<E>`：优先使用 `Vec<E>` 本身的绑定，否则收集全部 `E`
    pub fn resolve_list<E>(&self) -> DependencyResult<Vec<E>>
    where
        E: Clone + Send + Sync + 'static,
    {
        let dependency = Dependency::list::<E>();
        let key = dependency.key();
        let result = self.begin_resolution().and_then(|mut context| {
            let list = wiring::resolve_dependency(self, &mut context, &dependency)?;
            list.downcast::<Vec<E>>().map(|values| (*values).clone())
        });
        self.finish_resolution(&key, result)
    }

    /// 本容器或任一祖先中是否存在不带标识符的 `T` 绑定，不会创建实例
    pub fn has_binding<T: ?Sized + 'static>(&self) -> bool {
        self.has_key(&BindingKey::of::<T>())
    }

    /// 本容器或任一祖先中是否存在带指定标识符的 `T` 绑定
    pub fn has_binding_id<T: ?Sized + 'static>(&self, identifier: impl Into<Identifier>) -> bool {
        self.has_key(&BindingKey::with_id::<T>(identifier))
    }

    fn has_key(&self, key: &BindingKey) -> bool {
        !self.local_records(key).is_empty()
            || AncestorLevels::new(self.parent_containers())
                .flatten()
                .any(|container| !container.local_records(key).is_empty())
    }
}

impl InstanceResolver for DiContainer {
    fn resolve_key(
        &self,
        key: &BindingKey,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance> {
        context.push_key(self.id(), key)?;
        trace!(container = self.id(), key = %key, depth = context.depth(), "解析");
        let result = self
            .find_one(key)
            .and_then(|(owner, record)| owner.instantiate(&record, context));
        context.pop_key();
        result
    }

    fn resolve_all_keys(
        &self,
        key: &BindingKey,
        context: &mut ResolveContext,
    ) -> DependencyResult<Vec<Instance>> {
        context.push_key(self.id(), key)?;
        let matches = self.find_all(key);
        trace!(container = self.id(), key = %key, matches = matches.len(), "解析全部");
        let result = matches
            .iter()
            .map(|(owner, record)| owner.instantiate(record, context))
            .collect();
        context.pop_key();
        result
    }
}
