//! 元数据定义
//!
//! 提供类型的元数据信息

use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型ID
    pub id: TypeId,
    /// 完整类型名称（包含模块路径）
    pub name: &'static str,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub const fn new(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// 从类型获取类型信息，`T` 可以是 `dyn Trait`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 获取简短的类型名称（去掉每一段路径的模块前缀）
    ///
    /// `alloc::vec::Vec<alloc::string::String>` 会得到 `Vec<String>`。
    pub fn short_name(&self) -> String {
        shorten_type_name(self.name)
    }

    /// 判断是否为指定类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

fn shorten_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            segment.push(ch);
        } else {
            out.push_str(last_path_segment(&segment));
            segment.clear();
            out.push(ch);
        }
    }
    out.push_str(last_path_segment(&segment));
    out
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
