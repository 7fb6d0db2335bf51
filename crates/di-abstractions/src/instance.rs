//! 类型擦除的实例句柄

use di_common::{DependencyError, DependencyResult, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 类型擦除的实例
///
/// 内部保存一个 `Arc<T>`（`T` 可以是 `dyn Trait`），克隆只增加引用计数。
/// 解析类型为 `T` 的键得到的就是这里保存的 `Arc<T>`。
#[derive(Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_info: TypeInfo,
}

impl Instance {
    /// 包装一个共享值
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value: Arc::new(value),
            type_info: TypeInfo::of::<T>(),
        }
    }

    /// 包装一个具体值，运行时类型即 `T`
    pub fn of<T: Send + Sync + 'static>(value: T) -> Self {
        Self::new(Arc::new(value))
    }

    /// 实例的运行时类型
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// 是否为指定类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_info.is::<T>()
    }

    /// 取出 `Arc<T>`
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> DependencyResult<Arc<T>> {
        self.value
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or_else(|| DependencyError::TypeMismatch {
                expected: TypeInfo::of::<T>().short_name(),
                actual: self.type_info.short_name(),
            })
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_info.name)
            .finish_non_exhaustive()
    }
}
