//! 具体类型到接口（契约类型）的转换

use crate::instance::Instance;
use di_common::{DependencyResult, TypeInfo};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 把 `Arc<Self>` 转换为 `Arc<T>`
///
/// 每个类型都能转换为自身；要把具体类型绑定到 `dyn Trait`，为它实现
/// `Upcast<dyn Trait>`：
///
/// ```
/// use di_abstractions::Upcast;
/// use std::sync::Arc;
///
/// trait Speaker: Send + Sync {}
/// struct Dog;
/// impl Speaker for Dog {}
///
/// impl Upcast<dyn Speaker> for Dog {
///     fn upcast(self: Arc<Self>) -> Arc<dyn Speaker> {
///         self
///     }
/// }
/// ```
pub trait Upcast<T: ?Sized>: Send + Sync + 'static {
    /// 执行转换
    fn upcast(self: Arc<Self>) -> Arc<T>;
}

impl<T: Send + Sync + 'static> Upcast<T> for T {
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// 把具体实例转换为绑定键类型的实例
pub type CastFn = fn(&Instance) -> DependencyResult<Instance>;

/// 将 `C` 的实例转换为 `K` 的实例
pub fn cast_instance<C, K>(instance: &Instance) -> DependencyResult<Instance>
where
    C: Upcast<K>,
    K: ?Sized + Send + Sync + 'static,
{
    let concrete = instance.downcast::<C>()?;
    Ok(Instance::new(<C as Upcast<K>>::upcast(concrete)))
}

/// 不做转换（实例的运行时类型就是绑定键类型）
#[allow(clippy::unnecessary_wraps)]
pub fn identity_cast(instance: &Instance) -> DependencyResult<Instance> {
    Ok(instance.clone())
}

/// 一个具体类型 `C` 满足的接口
pub struct Capability<C> {
    /// 接口类型
    pub type_info: TypeInfo,
    /// `C` 到接口的转换
    pub cast: CastFn,
    _concrete: PhantomData<fn() -> C>,
}

impl<C: Send + Sync + 'static> Capability<C> {
    /// 接口 `I`
    pub fn of<I>() -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        C: Upcast<I>,
    {
        Self {
            type_info: TypeInfo::of::<I>(),
            cast: cast_instance::<C, I>,
            _concrete: PhantomData,
        }
    }
}

impl<C> fmt::Debug for Capability<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("interface", &self.type_info.name)
            .finish_non_exhaustive()
    }
}

/// 声明具体类型实现的全部接口
///
/// `bind_interfaces_to` 会为这里列出的每个接口各建一条绑定。
pub trait Capabilities: Sized + Send + Sync + 'static {
    /// 接口列表
    fn capabilities() -> Vec<Capability<Self>>;
}
