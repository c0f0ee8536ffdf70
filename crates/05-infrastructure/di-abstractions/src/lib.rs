//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义服务注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ServiceKey`] - 注册与解析的键
//! - [`ServiceRegistry`] / [`ServiceRegistryExt`] - 服务注册表接口
//! - [`ResolveContext`] - 带循环检测的解析引擎
//! - [`RouteProvider`] - 作用域层级的来源
//! - [`SecretStore`] / [`Debouncer`] / [`ResourceCache`] - 外部协作者接口

pub mod collaborators;
pub mod factory;
pub mod key;
pub mod registry;
pub mod resolver;
pub mod scope;

pub use collaborators::*;
pub use factory::*;
pub use key::*;
pub use registry::*;
pub use resolver::*;
pub use scope::*;
