//! # 依赖注入具体实现
//!
//! 提供具体的服务注册表、作用域链解析器以及外部协作者的进程内实现。
//!
//! ```rust
//! use di_abstractions::{ResolveContext, ServiceRegistryExt};
//! use di_impl::{ScopeChainResolver, ServiceRegistryImpl, SharedRoute};
//! use std::sync::Arc;
//!
//! struct Database(&'static str);
//! struct Repository(Arc<Database>);
//!
//! let registry = Arc::new(ServiceRegistryImpl::new());
//! registry.register_value(None, Some("app"), Database("primary"));
//! registry.register(None, Some("app/orders"), |ctx: &mut ResolveContext<'_>| {
//!     Ok(Repository(ctx.resolve::<Database>(None, Some("app"))?))
//! });
//!
//! let route = SharedRoute::new(vec!["app", "orders"]);
//! let resolver = ScopeChainResolver::new(registry, route);
//! let repository = resolver.find::<Repository>(None);
//! assert_eq!(repository.0 .0, "primary");
//! ```

pub mod debounce;
pub mod logging;
pub mod registry;
pub mod route;
pub mod scope_chain;
pub mod secret_store;

pub use debounce::TokioDebouncer;
pub use logging::{init_logging, LoggingConfig};
pub use registry::ServiceRegistryImpl;
pub use route::SharedRoute;
pub use scope_chain::ScopeChainResolver;
pub use secret_store::{DeviceIdentity, InMemorySecretStore, DEVICE_ID_KEY};
