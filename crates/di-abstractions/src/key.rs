//! 绑定键
//!
//! 解析目标由 (类型, 可选标识符) 组成。

use di_common::TypeInfo;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 可作为标识符的值
trait IdentifierValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_dyn(&self, other: &dyn IdentifierValue) -> bool;
    fn hash_dyn(&self, state: &mut dyn Hasher);
}

impl<T> IdentifierValue for T
where
    T: Any + Eq + Hash + fmt::Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_dyn(&self, other: &dyn IdentifierValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn hash_dyn(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

/// 绑定标识符
///
/// 任意可比较的值都可以作为标识符。两个标识符相等当且仅当底层值的类型相同且值相等；
/// 字符串字面量和 `String` 统一按 `String` 存储。
#[derive(Clone)]
pub struct Identifier(Arc<dyn IdentifierValue>);

/// 仅按身份比较的标识符值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct UniqueId(uuid::Uuid);

impl Identifier {
    /// 用任意可比较值创建标识符
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Eq + Hash + fmt::Debug + Send + Sync,
    {
        Self(Arc::new(value))
    }

    /// 创建一个与任何其他标识符都不相等的新标识符
    pub fn unique() -> Self {
        Self::new(UniqueId(uuid::Uuid::new_v4()))
    }

    /// 读取底层值
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash_dyn(state);
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<&Identifier> for Identifier {
    fn from(value: &Identifier) -> Self {
        value.clone()
    }
}

/// 绑定键
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    /// 请求的类型
    pub type_info: TypeInfo,
    /// 标识符；`None` 与任何 `Some` 都不相等
    pub identifier: Option<Identifier>,
}

impl BindingKey {
    /// 创建键
    pub const fn new(type_info: TypeInfo, identifier: Option<Identifier>) -> Self {
        Self {
            type_info,
            identifier,
        }
    }

    /// 不带标识符的键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(TypeInfo::of::<T>(), None)
    }

    /// 带标识符的键
    pub fn with_id<T: ?Sized + 'static>(identifier: impl Into<Identifier>) -> Self {
        Self::new(TypeInfo::of::<T>(), Some(identifier.into()))
    }

    /// 用于错误信息的标识符描述
    pub fn identifier_label(&self) -> Option<String> {
        self.identifier.as_ref().map(|id| format!("{id:?}"))
    }
}

impl fmt::Debug for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identifier {
            Some(id) => write!(f, "{} (ID: {id:?})", self.type_info),
            None => write!(f, "{}", self.type_info),
        }
    }
}
