//! 服务注册表抽象接口

use crate::factory::{into_factory, value_factory, ErasedService, ServiceFactory};
use crate::key::ServiceKey;
use crate::resolver::{ResolveContext, ResolveOptions, ServiceLookup};
use infrastructure_common::DependencyError;
use std::sync::Arc;

/// 服务注册表 trait
///
/// 对象安全的部分。注册表只在精确的作用域内查找，层级回退由
/// 作用域链解析器负责。
pub trait ServiceRegistry: ServiceLookup {
    /// 以查找接口的形式借出自身
    fn as_lookup(&self) -> &dyn ServiceLookup;

    /// 注册类型擦除的工厂，相同键的旧注册被替换
    fn register_erased(&self, key: ServiceKey, factory: ServiceFactory);

    /// 移除注册，返回是否存在过
    fn remove_key(&self, key: &ServiceKey) -> bool;

    /// 检查是否已注册
    fn contains_key(&self, key: &ServiceKey) -> bool;

    /// 移除整个作用域
    fn clear_scope(&self, scope: &str);

    /// 清理所有注册
    fn clear(&self);

    /// 获取所有已注册的键
    fn registered_keys(&self) -> Vec<ServiceKey>;

    /// 获取所有非空作用域（已排序）
    fn scopes(&self) -> Vec<String>;

    /// 已注册数量
    fn registration_count(&self) -> usize;

    /// 新解析上下文使用的选项
    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions::default()
    }

    /// 以新的解析栈解析类型擦除的服务
    fn resolve_erased(&self, key: &ServiceKey) -> Result<ErasedService, DependencyError> {
        ResolveContext::new(self.as_lookup(), self.resolve_options()).resolve_key(key)
    }
}

/// 类型化的注册表扩展方法
pub trait ServiceRegistryExt: ServiceRegistry {
    /// 注册工厂
    fn register<T, F>(&self, name: Option<&str>, scope: Option<&str>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&mut ResolveContext<'_>) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        self.register_erased(ServiceKey::of::<T>(name, scope), into_factory(factory));
    }

    /// 注册实例，每次解析返回同一个 `Arc`
    fn register_value<T>(&self, name: Option<&str>, scope: Option<&str>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.register_erased(ServiceKey::of::<T>(name, scope), value_factory(value));
    }

    /// 解析服务
    fn resolve<T>(&self, name: Option<&str>, scope: Option<&str>) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        ResolveContext::new(self.as_lookup(), self.resolve_options()).resolve::<T>(name, scope)
    }

    /// 删除注册，不存在时什么也不做
    fn delete<T>(&self, name: Option<&str>, scope: Option<&str>)
    where
        T: 'static,
    {
        self.remove_key(&ServiceKey::of::<T>(name, scope));
    }

    /// 检查是否已注册，不调用工厂
    fn has_registration<T>(&self, name: Option<&str>, scope: Option<&str>) -> bool
    where
        T: 'static,
    {
        self.contains_key(&ServiceKey::of::<T>(name, scope))
    }
}

impl<R: ServiceRegistry + ?Sized> ServiceRegistryExt for R {}
