//! 依赖注入容器配置与统计

use serde::{Deserialize, Serialize};

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 是否启用循环依赖检测
    pub enable_circular_dependency_detection: bool,
    /// 最大解析深度
    pub max_resolution_depth: usize,
}

impl ContainerConfig {
    /// 从 JSON 文本读取配置，缺省字段取默认值
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            enable_circular_dependency_detection: true,
            max_resolution_depth: 100,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContainerStats {
    /// 当前已注册的绑定记录数量
    pub registered_bindings: usize,
    /// 对外解析调用次数（不含嵌套解析）
    pub resolutions: usize,
    /// 构造出的实例数量
    pub instances_created: usize,
    /// 解析错误数量
    pub resolution_errors: usize,
}
