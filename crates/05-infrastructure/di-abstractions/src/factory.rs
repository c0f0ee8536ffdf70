//! 服务工厂抽象
//!
//! 工厂在解析时才被调用，每次解析调用一次，不做缓存。

use crate::key::ServiceKey;
use crate::resolver::ResolveContext;
use infrastructure_common::DependencyError;
use std::any::Any;
use std::sync::Arc;

/// 类型擦除后的服务实例
pub type ErasedService = Arc<dyn Any + Send + Sync>;

/// 类型擦除后的工厂函数
///
/// 工厂通过传入的 [`ResolveContext`] 解析自身依赖，因此同一解析链共享同一个解析栈。
pub type ServiceFactory =
    Arc<dyn Fn(&mut ResolveContext<'_>) -> Result<ErasedService, DependencyError> + Send + Sync>;

/// 将类型化工厂包装为 [`ServiceFactory`]
pub fn into_factory<T, F>(factory: F) -> ServiceFactory
where
    T: Send + Sync + 'static,
    F: Fn(&mut ResolveContext<'_>) -> Result<T, DependencyError> + Send + Sync + 'static,
{
    erased(move |ctx| factory(ctx).map(|service| Arc::new(service) as ErasedService))
}

/// 包装预先构建的实例，每次解析都返回同一个 `Arc`
pub fn value_factory<T>(value: T) -> ServiceFactory
where
    T: Send + Sync + 'static,
{
    shared_factory(Arc::new(value))
}

/// 包装共享实例
pub fn shared_factory<T>(shared: Arc<T>) -> ServiceFactory
where
    T: Send + Sync + 'static,
{
    erased(move |_| Ok(Arc::clone(&shared) as ErasedService))
}

fn erased<F>(factory: F) -> ServiceFactory
where
    F: Fn(&mut ResolveContext<'_>) -> Result<ErasedService, DependencyError> + Send + Sync + 'static,
{
    Arc::new(factory)
}

/// 服务注册信息
#[derive(Clone)]
pub struct Registration {
    /// 注册键
    pub key: ServiceKey,
    /// 工厂
    pub factory: ServiceFactory,
}

impl Registration {
    pub fn new(key: ServiceKey, factory: ServiceFactory) -> Self {
        Self { key, factory }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .field("factory", &"<factory>")
            .finish()
    }
}
