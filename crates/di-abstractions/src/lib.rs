//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义绑定键、类型擦除实例和构造描述的核心接口。
//!
//! ## 核心接口
//!
//! - [`BindingKey`] / [`Identifier`] - 解析目标（类型 + 可选标识符）
//! - [`Instance`] - 类型擦除的实例句柄
//! - [`Injectable`] / [`Dependency`] / [`Arguments`] - 构造函数描述与参数
//! - [`Upcast`] / [`Capabilities`] - 具体类型到接口的转换
//! - [`InstanceResolver`] / [`ResolveContext`] - 按键解析与循环依赖检测
//! - [`ContainerConfig`] / [`ContainerStats`] - 容器配置与统计

pub mod capability;
pub mod container;
pub mod factory;
pub mod instance;
pub mod key;
pub mod resolver;

pub use capability::*;
pub use container::*;
pub use factory::*;
pub use instance::*;
pub use key::*;
pub use resolver::*;

pub use di_common::{DependencyError, DependencyResult, Lifetime, TypeInfo};
