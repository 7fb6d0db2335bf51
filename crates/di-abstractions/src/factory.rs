//! 构造描述
//!
//! 容器不做反射：每个可构造类型通过 [`Injectable`] 声明自己的构造参数，
//! 并在参数解析完成后由 [`Injectable::construct`] 创建实例。

use crate::instance::Instance;
use crate::key::{BindingKey, Identifier};
use di_common::{DependencyError, DependencyResult, TypeInfo};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// 可由容器构造的类型
///
/// # Examples
///
/// ```
/// use di_abstractions::{Arguments, Dependency, DependencyResult, Injectable};
///
/// struct Fizz {
///     id: i32,
///     name: String,
/// }
///
/// impl Injectable for Fizz {
///     fn dependencies() -> Vec<Dependency> {
///         vec![Dependency::of::<i32>(), Dependency::of::<String>()]
///     }
///
///     fn construct(args: &mut Arguments) -> DependencyResult<Self> {
///         Ok(Self {
///             id: args.take_cloned()?,
///             name: args.take_cloned()?,
///         })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// 构造参数描述，顺序即 [`Arguments`] 中值的顺序
    fn dependencies() -> Vec<Dependency> {
        Vec::new()
    }

    /// 用解析好的参数创建实例
    fn construct(args: &mut Arguments) -> DependencyResult<Self>;
}

/// 集合参数的组装函数
pub type AssembleFn = fn(Vec<Instance>) -> DependencyResult<Instance>;

/// 集合参数描述
#[derive(Clone, Copy)]
pub struct CollectionSpec {
    /// 元素类型
    pub element: TypeInfo,
    /// 将元素实例组装为集合实例
    pub assemble: AssembleFn,
}

/// 单个构造参数的描述
#[derive(Clone)]
pub struct Dependency {
    /// 参数声明的类型（集合参数即集合类型本身）
    pub type_info: TypeInfo,
    /// 解析时使用的标识符
    pub identifier: Option<Identifier>,
    /// 集合参数的元素信息
    pub collection: Option<CollectionSpec>,
}

impl Dependency {
    /// 类型为 `T` 的参数，构造时得到 `Arc<T>`
    pub fn of<T: ?Sized + Send + Sync + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            identifier: None,
            collection: None,
        }
    }

    /// 类型为 `Vec<E>` 的参数
    ///
    /// 优先使用 `Vec<E>` 本身的绑定；没有时收集所有 `E` 的绑定，零个即空集合。
    pub fn list<E: Clone + Send + Sync + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<Vec<E>>(),
            identifier: None,
            collection: Some(CollectionSpec {
                element: TypeInfo::of::<E>(),
                assemble: assemble_cloned::<E>,
            }),
        }
    }

    /// 类型为 `Vec<Arc<E>>` 的参数，`E` 可以是 `dyn Trait`
    pub fn shared_list<E: ?Sized + Send + Sync + 'static>() -> Self {
        Self {
            type_info: TypeInfo::of::<Vec<Arc<E>>>(),
            identifier: None,
            collection: Some(CollectionSpec {
                element: TypeInfo::of::<E>(),
                assemble: assemble_shared::<E>,
            }),
        }
    }

    /// 指定解析标识符
    #[must_use]
    pub fn with_id(mut self, identifier: impl Into<Identifier>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// 参数自身的绑定键
    pub fn key(&self) -> BindingKey {
        BindingKey::new(self.type_info, self.identifier.clone())
    }

    /// 集合元素的绑定键
    pub fn element_key(&self) -> Option<BindingKey> {
        self.collection
            .map(|spec| BindingKey::new(spec.element, self.identifier.clone()))
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("key", &self.key())
            .field("collection", &self.collection.map(|c| c.element.name))
            .finish()
    }
}

fn assemble_cloned<E: Clone + Send + Sync + 'static>(
    items: Vec<Instance>,
) -> DependencyResult<Instance> {
    let values = items
        .iter()
        .map(|item| item.downcast::<E>().map(|value| (*value).clone()))
        .collect::<DependencyResult<Vec<E>>>()?;
    Ok(Instance::of(values))
}

fn assemble_shared<E: ?Sized + Send + Sync + 'static>(
    items: Vec<Instance>,
) -> DependencyResult<Instance> {
    let values = items
        .iter()
        .map(Instance::downcast::<E>)
        .collect::<DependencyResult<Vec<Arc<E>>>>()?;
    Ok(Instance::of(values))
}

/// 解析好的构造参数，按 [`Injectable::dependencies`] 的顺序依次取出
#[derive(Debug)]
pub struct Arguments {
    owner: TypeInfo,
    values: VecDeque<Instance>,
}

impl Arguments {
    /// 创建参数列表
    pub fn new(owner: TypeInfo, values: impl IntoIterator<Item = Instance>) -> Self {
        Self {
            owner,
            values: values.into_iter().collect(),
        }
    }

    /// 正在构造的类型
    pub const fn owner(&self) -> TypeInfo {
        self.owner
    }

    /// 剩余参数个数
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否已取完
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 取出下一个参数
    pub fn take<T: ?Sized + Send + Sync + 'static>(&mut self) -> DependencyResult<Arc<T>> {
        let value = self
            .values
            .pop_front()
            .ok_or_else(|| DependencyError::TypeMismatch {
                expected: TypeInfo::of::<T>().short_name(),
                actual: format!("<{} 的构造参数已取完>", self.owner),
            })?;
        value.downcast::<T>()
    }

    /// 取出下一个参数并克隆出值
    pub fn take_cloned<T: Clone + Send + Sync + 'static>(&mut self) -> DependencyResult<T> {
        self.take::<T>().map(|value| (*value).clone())
    }
}

/// 构造函数：具体类型、参数描述与类型擦除的构造入口
#[derive(Clone, Copy)]
pub struct Constructor {
    /// 被构造的具体类型
    pub concrete: TypeInfo,
    /// 参数描述
    pub dependencies: fn() -> Vec<Dependency>,
    /// 构造入口，返回具体类型的实例
    pub construct: fn(&mut Arguments) -> DependencyResult<Instance>,
}

impl Constructor {
    /// `C` 的构造函数
    pub fn of<C: Injectable>() -> Self {
        Self {
            concrete: TypeInfo::of::<C>(),
            dependencies: C::dependencies,
            construct: construct_erased::<C>,
        }
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("concrete", &self.concrete.name)
            .finish_non_exhaustive()
    }
}

fn construct_erased<C: Injectable>(args: &mut Arguments) -> DependencyResult<Instance> {
    C::construct(args).map(Instance::of)
}
