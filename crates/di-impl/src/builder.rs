//! 绑定构建器
//!
//! 构建器在释放时把配置好的绑定提交到容器，下一次绑定或解析调用时生效：
//!
//! ```
//! use di_impl::DiContainer;
//!
//! let container = DiContainer::new();
//! container.bind_instance(42_i32)?.with_id("answer").as_single();
//! assert_eq!(*container.resolve_id::<i32>("answer")?, 42);
//! # Ok::<(), di_abstractions::DependencyError>(())
//! ```

use crate::container::DiContainer;
use crate::record::{BindingDraft, BindingTarget, Contract};
use di_abstractions::{
    cast_instance, identity_cast, BindingKey, CastFn, Constructor, Identifier, Injectable,
    Instance, Lifetime, TypeInfo, Upcast,
};
use std::marker::PhantomData;

/// 尚未提交的绑定草稿，释放时提交
struct PendingBinding {
    container: DiContainer,
    draft: Option<BindingDraft>,
}

impl PendingBinding {
    fn new(container: DiContainer, draft: BindingDraft) -> Self {
        Self {
            container,
            draft: Some(draft),
        }
    }

    fn update(&mut self, change: impl FnOnce(&mut BindingDraft)) {
        if let Some(draft) = self.draft.as_mut() {
            change(draft);
        }
    }

    fn set_lifetime(&mut self, lifetime: Lifetime) {
        self.update(|draft| draft.lifetime = lifetime);
    }

    fn set_identifier(&mut self, identifier: Identifier) {
        self.update(|draft| draft.identifier = Some(identifier));
    }

    fn push_arguments(&mut self, values: impl IntoIterator<Item = Instance>) {
        self.update(|draft| draft.arguments.extend(values));
    }
}

impl Drop for PendingBinding {
    fn drop(&mut self) {
        if let Some(draft) = self.draft.take() {
            self.container.commit(draft);
        }
    }
}

/// 单个契约类型 `K` 的绑定构建器
///
/// 默认作用域为 Transient，没有标识符也没有显式参数。
pub struct BindingBuilder<K: ?Sized> {
    pending: PendingBinding,
    _contract: PhantomData<fn() -> Box<K>>,
}

impl<K> BindingBuilder<K>
where
    K: ?Sized + Send + Sync + 'static,
{
    pub(crate) fn new(container: DiContainer, target: Option<BindingTarget>) -> Self {
        let contract = Contract {
            type_info: TypeInfo::of::<K>(),
            cast: identity_cast,
        };
        Self {
            pending: PendingBinding::new(container, BindingDraft::new(vec![contract], target)),
            _contract: PhantomData,
        }
    }

    fn retarget(mut self, target: BindingTarget, cast: CastFn) -> Self {
        self.pending.update(|draft| {
            draft.target = Some(target);
            for contract in &mut draft.contracts {
                contract.cast = cast;
            }
        });
        self
    }

    /// 解析时构造 `C`
    pub fn to<C>(self) -> Self
    where
        C: Injectable + Upcast<K>,
    {
        self.retarget(
            BindingTarget::Construct(Constructor::of::<C>()),
            cast_instance::<C, K>,
        )
    }

    /// 解析时返回给定的值，忽略作用域
    pub fn to_instance<C>(self, value: C) -> Self
    where
        C: Upcast<K>,
    {
        self.retarget(
            BindingTarget::Instance(Instance::of(value)),
            cast_instance::<C, K>,
        )
    }

    /// 解析时转而在同一容器中解析 `S`
    pub fn from_resolve<S>(self) -> Self
    where
        S: Upcast<K>,
    {
        self.retarget(
            BindingTarget::FromResolve(BindingKey::of::<S>()),
            cast_instance::<S, K>,
        )
    }

    /// 解析时转而在同一容器中解析带标识符的 `S`
    pub fn from_resolve_id<S>(self, identifier: impl Into<Identifier>) -> Self
    where
        S: Upcast<K>,
    {
        self.retarget(
            BindingTarget::FromResolve(BindingKey::with_id::<S>(identifier)),
            cast_instance::<S, K>,
        )
    }

    /// 每次解析都创建新实例
    pub fn as_transient(mut self) -> Self {
        self.pending.set_lifetime(Lifetime::Transient);
        self
    }

    /// 本条绑定首次解析时创建并缓存
    pub fn as_cached(mut self) -> Self {
        self.pending.set_lifetime(Lifetime::Cached);
        self
    }

    /// 缓存，并且要求本容器中该键只有这一条 Single 绑定
    pub fn as_single(mut self) -> Self {
        self.pending.set_lifetime(Lifetime::Single);
        self
    }

    /// 设置标识符
    pub fn with_id(mut self, identifier: impl Into<Identifier>) -> Self {
        self.pending.set_identifier(identifier.into());
        self
    }

    /// 追加显式构造参数
    pub fn with_arguments(mut self, values: impl IntoIterator<Item = Instance>) -> Self {
        self.pending.push_arguments(values);
        self
    }

    /// 追加一个显式构造参数
    pub fn with_argument<T: Send + Sync + 'static>(self, value: T) -> Self {
        self.with_arguments([Instance::of(value)])
    }
}

/// `bind_interfaces_to` 的构建器：一次配置多条共享缓存的绑定
pub struct InterfacesBuilder {
    pending: PendingBinding,
}

impl InterfacesBuilder {
    pub(crate) fn new(container: DiContainer, draft: BindingDraft) -> Self {
        Self {
            pending: PendingBinding::new(container, draft),
        }
    }

    /// 每次解析都创建新实例
    pub fn as_transient(mut self) -> Self {
        self.pending.set_lifetime(Lifetime::Transient);
        self
    }

    /// 首次解析时创建，之后所有接口共用这个实例
    pub fn as_cached(mut self) -> Self {
        self.pending.set_lifetime(Lifetime::Cached);
        self
    }

    /// 同 [`as_cached`](Self::as_cached)，并对每个接口做 Single 检查
    pub fn as_single(mut self) -> Self {
        self.pending.set_lifetime(Lifetime::Single);
        self
    }

    /// 为所有接口设置同一个标识符
    pub fn with_id(mut self, identifier: impl Into<Identifier>) -> Self {
        self.pending.set_identifier(identifier.into());
        self
    }

    /// 追加显式构造参数
    pub fn with_arguments(mut self, values: impl IntoIterator<Item = Instance>) -> Self {
        self.pending.push_arguments(values);
        self
    }

    /// 追加一个显式构造参数
    pub fn with_argument<T: Send + Sync + 'static>(self, value: T) -> Self {
        self.with_arguments([Instance::of(value)])
    }
}
