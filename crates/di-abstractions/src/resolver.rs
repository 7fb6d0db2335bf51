//! 实例解析器抽象接口
//!
//! 提供按键解析的能力和解析链上的循环依赖检测

use crate::container::ContainerConfig;
use crate::instance::Instance;
use crate::key::BindingKey;
use di_common::{DependencyError, DependencyResult};

/// 实例解析器 trait
///
/// 负责按绑定键解析实例。构造参数的自动装配只依赖这个接口。
pub trait InstanceResolver {
    /// 解析恰好一个匹配的实例
    fn resolve_key(
        &self,
        key: &BindingKey,
        context: &mut ResolveContext,
    ) -> DependencyResult<Instance>;

    /// 解析所有匹配的实例，零个匹配返回空列表
    fn resolve_all_keys(
        &self,
        key: &BindingKey,
        context: &mut ResolveContext,
    ) -> DependencyResult<Vec<Instance>>;
}

/// 解析链中的一帧
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFrame {
    /// 执行解析的容器
    pub container_id: u64,
    /// 正在解析的键
    pub key: BindingKey,
}

/// 解析上下文
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<ResolutionFrame>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 添加键到解析链
    pub fn push_key(&mut self, container_id: u64, key: &BindingKey) -> DependencyResult<()> {
        let frame = ResolutionFrame {
            container_id,
            key: key.clone(),
        };
        if self.options.detect_cycles && self.resolution_chain.contains(&frame) {
            return Err(DependencyError::CyclicDependency {
                dependency_chain: self.describe_chain(key),
            });
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                max_depth: self.options.max_depth,
                dependency_chain: self.describe_chain(key),
            });
        }
        self.resolution_chain.push(frame);
        Ok(())
    }

    /// 从解析链中移除最后一个键
    pub fn pop_key(&mut self) {
        self.resolution_chain.pop();
    }

    fn describe_chain(&self, next: &BindingKey) -> String {
        self.resolution_chain
            .iter()
            .map(|frame| frame.key.to_string())
            .chain(std::iter::once(next.to_string()))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new(ResolveOptions::default())
    }
}

/// 解析选项
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// 是否检测循环依赖
    pub detect_cycles: bool,
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::from(&ContainerConfig::default())
    }
}

impl From<&ContainerConfig> for ResolveOptions {
    fn from(config: &ContainerConfig) -> Self {
        Self {
            detect_cycles: config.enable_circular_dependency_detection,
            max_depth: config.max_resolution_depth,
        }
    }
}
