//! # DI Common
//!
//! 这个 crate 提供了依赖注入容器各层共用的基础类型。
//!
//! ## 核心组件
//!
//! - [`DependencyError`] - 绑定与解析过程中的错误类型
//! - [`TypeInfo`] - 类型元数据（`TypeId` + 类型名）
//! - [`Lifetime`] - 绑定的作用域策略
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的类型标识
//! - 错误携带足够的诊断上下文（类型名、标识符）

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
