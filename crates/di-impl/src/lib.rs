//! # 依赖注入具体实现
//!
//! 提供分层依赖注入容器：绑定注册表、作用域缓存、沿父容器层级的解析器
//! 以及构造参数的自动装配。
//!
//! ```
//! use di_abstractions::{Arguments, Dependency, DependencyResult, Injectable};
//! use di_impl::DiContainer;
//!
//! struct Greeting {
//!     text: String,
//! }
//!
//! impl Injectable for Greeting {
//!     fn dependencies() -> Vec<Dependency> {
//!         vec![Dependency::of::<String>()]
//!     }
//!
//!     fn construct(args: &mut Arguments) -> DependencyResult<Self> {
//!         Ok(Self { text: args.take_cloned()? })
//!     }
//! }
//!
//! let root = DiContainer::new();
//! root.bind_instance("hello".to_string())?;
//!
//! let child = root.create_sub_container();
//! child.bind::<Greeting>()?.as_cached();
//!
//! let first = child.resolve::<Greeting>()?;
//! let second = child.resolve::<Greeting>()?;
//! assert_eq!(first.text, "hello");
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! # Ok::<(), di_abstractions::DependencyError>(())
//! ```

mod builder;
mod container;
mod hierarchy;
mod record;
mod registry;
mod resolver;
mod scope;
mod wiring;

pub use builder::{BindingBuilder, InterfacesBuilder};
pub use container::DiContainer;
pub use hierarchy::{ancestors, AncestorLevels};
pub use record::{BindingRecord, BindingTarget};
pub use registry::BindingRegistry;
pub use scope::ScopeSlot;
pub use wiring::{construct, resolve_dependency};
