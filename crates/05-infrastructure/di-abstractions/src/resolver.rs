//! 依赖解析引擎
//!
//! [`ResolveContext`] 持有一次顶层解析调用的解析栈。工厂收到同一个上下文，
//! 通过它解析自身依赖，因此循环检测只作用于同一条调用链，
//! 并发的独立解析互不干扰。

use crate::factory::{ErasedService, ServiceFactory};
use crate::key::ServiceKey;
use infrastructure_common::DependencyError;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// 服务查找接口
///
/// 注册表中只读、与泛型无关的一半，供解析引擎取出工厂。
pub trait ServiceLookup: Send + Sync {
    /// 按精确的键查找工厂，不做作用域回退
    fn factory_for(&self, key: &ServiceKey) -> Option<ServiceFactory>;

    /// 是否记录每次成功解析
    fn log_resolutions(&self) -> bool {
        false
    }
}

/// 解析选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

/// 解析上下文
pub struct ResolveContext<'r> {
    lookup: &'r dyn ServiceLookup,
    /// 当前解析链，用于检测循环依赖
    resolution_chain: Vec<ServiceKey>,
    options: ResolveOptions,
}

impl<'r> ResolveContext<'r> {
    /// 创建新的解析上下文，解析栈为空
    pub fn new(lookup: &'r dyn ServiceLookup, options: ResolveOptions) -> Self {
        Self {
            lookup,
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 当前解析链
    pub fn resolution_chain(&self) -> &[ServiceKey] {
        &self.resolution_chain
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// 添加键到解析链
    pub fn push_key(&mut self, key: ServiceKey) -> Result<(), DependencyError> {
        if self.resolution_chain.contains(&key) {
            let chain: Vec<String> = self
                .resolution_chain
                .iter()
                .chain(std::iter::once(&key))
                .map(ToString::to_string)
                .collect();
            warn!("检测到循环依赖: {}", chain.join(" → "));
            return Err(DependencyError::CircularDependency { chain });
        }

        if self.resolution_chain.len() >= self.options.max_depth {
            warn!(depth = self.options.max_depth, key = %key, "解析深度超过上限");
            return Err(DependencyError::ResolutionDepthExceeded {
                depth: self.options.max_depth,
                key: key.to_string(),
            });
        }

        trace!(key = %key, depth = self.resolution_chain.len() + 1, "推入解析栈");
        self.resolution_chain.push(key);
        Ok(())
    }

    /// 从解析链中移除最后一个键
    pub fn pop_key(&mut self) -> Option<ServiceKey> {
        let key = self.resolution_chain.pop();
        if let Some(key) = &key {
            trace!(key = %key, depth = self.resolution_chain.len(), "弹出解析栈");
        }
        key
    }

    /// 解析类型擦除的服务
    ///
    /// 无论成功与否，返回前都会把键弹出解析栈。
    pub fn resolve_key(&mut self, key: &ServiceKey) -> Result<ErasedService, DependencyError> {
        self.push_key(key.clone())?;
        let result = self.invoke(key);
        self.pop_key();
        result
    }

    fn invoke(&mut self, key: &ServiceKey) -> Result<ErasedService, DependencyError> {
        let factory = self
            .lookup
            .factory_for(key)
            .ok_or_else(|| DependencyError::not_found(key.descriptor()))?;
        factory(self)
    }

    /// 按键解析并向下转换为 `T`
    ///
    /// 工厂产出的类型与 `T` 不符时按未找到处理。
    pub fn resolve_as<T>(&mut self, key: &ServiceKey) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        let service = self.resolve_key(key)?;
        match service.downcast::<T>() {
            Ok(typed) => {
                if self.lookup.log_resolutions() {
                    debug!(key = %key, "解析成功");
                }
                Ok(typed)
            }
            Err(_) => {
                debug!(key = %key, requested = std::any::type_name::<T>(), "工厂产出类型不匹配");
                Err(DependencyError::not_found(format!(
                    "{} (类型不匹配: {})",
                    std::any::type_name::<T>(),
                    key
                )))
            }
        }
    }

    /// 解析指定类型、名称和作用域的服务
    pub fn resolve<T>(&mut self, name: Option<&str>, scope: Option<&str>) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        let key = ServiceKey::of::<T>(name, scope);
        self.resolve_as::<T>(&key)
    }

    /// 解析可选依赖，只有未找到会被转换为 `None`
    pub fn try_resolve<T>(
        &mut self,
        name: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Option<Arc<T>>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        match self.resolve::<T>(name, scope) {
            Ok(service) => Ok(Some(service)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for ResolveContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveContext")
            .field("resolution_chain", &self.resolution_chain)
            .field("options", &self.options)
            .finish()
    }
}
