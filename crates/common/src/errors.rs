//! 错误类型定义

use thiserror::Error;

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("无法解析 '{}'", describe_key(.type_name, .identifier))]
    Unresolvable {
        type_name: String,
        identifier: Option<String>,
    },

    #[error(
        "期望唯一匹配却找到 {candidates} 个: '{}'",
        describe_key(.type_name, .identifier)
    )]
    AmbiguousMatch {
        type_name: String,
        identifier: Option<String>,
        candidates: usize,
    },

    #[error(
        "同一类型被多次绑定为 Single 作用域: '{}'",
        describe_key(.type_name, .identifier)
    )]
    BindingConflict {
        type_name: String,
        identifier: Option<String>,
    },

    #[error("构建类型 '{owner}' 时无法解析构造参数: {source}")]
    ArgumentUnresolvable {
        owner: String,
        #[source]
        source: Box<DependencyError>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CyclicDependency { dependency_chain: String },

    #[error("解析深度超过上限 {max_depth}: {dependency_chain}")]
    ResolutionDepthExceeded {
        max_depth: usize,
        dependency_chain: String,
    },

    #[error("类型转换失败: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ConstructionFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DependencyError {
    /// 创建解析失败错误
    pub fn unresolvable(type_name: impl Into<String>, identifier: Option<String>) -> Self {
        Self::Unresolvable {
            type_name: type_name.into(),
            identifier,
        }
    }

    /// 创建组件创建失败错误
    pub fn construction_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConstructionFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 包装为构造参数解析失败
    ///
    /// 只有查找类错误（未找到、多重匹配、嵌套的参数失败）会被包装，
    /// 其余错误原样返回。
    #[must_use]
    pub fn while_building(self, owner: impl Into<String>) -> Self {
        match self {
            Self::Unresolvable { .. }
            | Self::AmbiguousMatch { .. }
            | Self::ArgumentUnresolvable { .. } => Self::ArgumentUnresolvable {
                owner: owner.into(),
                source: Box::new(self),
            },
            other => other,
        }
    }

    /// 最内层的错误（穿过所有 `ArgumentUnresolvable` 包装）
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::ArgumentUnresolvable { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// 是否为“未找到任何绑定”
    pub const fn is_unresolvable(&self) -> bool {
        matches!(self, Self::Unresolvable { .. })
    }
}

fn describe_key(type_name: &str, identifier: &Option<String>) -> String {
    match identifier {
        Some(id) => format!("{type_name} (ID: {id})"),
        None => type_name.to_string(),
    }
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
