//! # Infrastructure Common
//!
//! 依赖注入注册表共享的基础类型。
//!
//! ## 核心内容
//!
//! - [`DependencyError`] - 解析与注册错误
//! - [`TypeInfo`] - 服务类型的诊断元数据
//! - [`RegistrySettings`] - 注册表配置
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的类型擦除与安全向下转换
//! - 显式传递的注册表实例，不依赖全局单例

pub mod configuration;
pub mod errors;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use metadata::*;
