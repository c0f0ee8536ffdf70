//! 作用域链解析器
//!
//! 根据当前路由计算有序的作用域列表（最具体的在前），逐个尝试精确作用域解析。
//! 子作用域的注册因此会遮蔽父作用域的同名注册。
//! 一次顶层解析的所有尝试共用同一个 [`ResolveContext`]。

use di_abstractions::{
    scope_chain, scope_path, ResolveContext, RouteProvider, ServiceRegistry, ServiceRegistryExt,
    DEFAULT_SERVICE_NAME, GLOBAL_SCOPE_LABEL,
};
use infrastructure_common::DependencyError;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, trace};

/// 作用域链解析器
pub struct ScopeChainResolver<P> {
    registry: Arc<dyn ServiceRegistry>,
    route: P,
}

impl<P: RouteProvider> ScopeChainResolver<P> {
    /// 包装注册表和路由提供者
    pub fn new(registry: Arc<dyn ServiceRegistry>, route: P) -> Self {
        Self { registry, route }
    }

    /// 底层注册表
    pub fn registry(&self) -> &Arc<dyn ServiceRegistry> {
        &self.registry
    }

    /// 当前最具体的作用域路径
    pub fn current_scope_path(&self) -> String {
        scope_path(&self.route.current_route())
    }

    /// 当前路由的所有作用域，从最具体到最不具体
    pub fn all_possible_scopes(&self) -> Vec<String> {
        scope_chain(&self.route.current_route())
    }

    /// 沿作用域链解析，不使用全局注册
    ///
    /// 某个作用域未找到时继续下一个，其他错误立即返回。
    /// 工厂内部请改用 [`resolve_in`](Self::resolve_in)，以沿用调用方的解析栈。
    pub fn resolve<T>(&self, name: Option<&str>) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        self.resolve_in(&mut self.root_context(), name)
    }

    /// 在已有的解析上下文中沿作用域链解析
    ///
    /// 每次尝试都推入同一个解析栈，经过作用域链的循环依赖因此可以被检测到。
    pub fn resolve_in<T>(
        &self,
        ctx: &mut ResolveContext<'_>,
        name: Option<&str>,
    ) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        let scopes = self.all_possible_scopes();
        for scope in &scopes {
            if let Some(service) = attempt::<T>(ctx, name, Some(scope.as_str()))? {
                return Ok(service);
            }
        }
        Err(not_found::<T>(name, &scopes))
    }

    /// 先尝试显式作用域，再沿作用域链，最后回退到全局注册
    ///
    /// 显式作用域只是第一次猜测，未命中时不会阻止后续回退。
    pub fn resolve_with_scope<T>(
        &self,
        name: Option<&str>,
        explicit_scope: Option<&str>,
    ) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        self.resolve_with_scope_in(&mut self.root_context(), name, explicit_scope)
    }

    /// [`resolve_with_scope`](Self::resolve_with_scope) 的上下文版本
    pub fn resolve_with_scope_in<T>(
        &self,
        ctx: &mut ResolveContext<'_>,
        name: Option<&str>,
        explicit_scope: Option<&str>,
    ) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        let mut tried = Vec::new();

        if let Some(scope) = explicit_scope {
            if let Some(service) = attempt::<T>(ctx, name, Some(scope))? {
                return Ok(service);
            }
            tried.push(scope.to_string());
        }

        for scope in self.all_possible_scopes() {
            if explicit_scope == Some(scope.as_str()) {
                continue;
            }
            if let Some(service) = attempt::<T>(ctx, name, Some(scope.as_str()))? {
                return Ok(service);
            }
            tried.push(scope);
        }

        if let Some(service) = attempt::<T>(ctx, name, None)? {
            debug!(service = std::any::type_name::<T>(), "作用域链未命中，使用全局注册");
            return Ok(service);
        }
        tried.push(GLOBAL_SCOPE_LABEL.to_string());

        Err(not_found::<T>(name, &tried))
    }

    /// 注册到当前作用域路径；路由为空时注册为全局
    pub fn register<T, F>(&self, name: Option<&str>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&mut ResolveContext<'_>) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        let path = self.current_scope_path();
        self.registry.register::<T, F>(name, non_empty(&path), factory);
    }

    /// 注册实例到当前作用域路径
    pub fn register_value<T>(&self, name: Option<&str>, value: T)
    where
        T: Send + Sync + 'static,
    {
        let path = self.current_scope_path();
        self.registry.register_value(name, non_empty(&path), value);
    }

    /// 清理路由前缀对应的作用域（仅该精确路径）
    pub fn cleanup_scope<S: Display>(&self, route_prefix: &[S]) {
        self.registry.clear_scope(&scope_path(route_prefix));
    }

    /// 解析依赖，失败时 panic
    ///
    /// # Panics
    ///
    /// 依赖可能合法缺失时不要使用此方法：任何解析错误都会导致 panic。
    pub fn find<T>(&self, name: Option<&str>) -> Arc<T>
    where
        T: Send + Sync + 'static,
    {
        match self.resolve::<T>(name) {
            Ok(service) => service,
            Err(e) => panic!("无法解析依赖 {}: {e}", std::any::type_name::<T>()),
        }
    }

    /// 顶层调用使用的空解析上下文
    fn root_context(&self) -> ResolveContext<'_> {
        ResolveContext::new(self.registry.as_lookup(), self.registry.resolve_options())
    }
}

impl<P> std::fmt::Debug for ScopeChainResolver<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeChainResolver")
            .field("registration_count", &self.registry.registration_count())
            .finish_non_exhaustive()
    }
}

/// 单个作用域的一次尝试，未找到映射为 `None`
fn attempt<T>(
    ctx: &mut ResolveContext<'_>,
    name: Option<&str>,
    scope: Option<&str>,
) -> Result<Option<Arc<T>>, DependencyError>
where
    T: Send + Sync + 'static,
{
    let service = ctx.try_resolve::<T>(name, scope)?;
    if service.is_none() {
        trace!(scope = scope.unwrap_or(GLOBAL_SCOPE_LABEL), "作用域未命中");
    }
    Ok(service)
}

fn non_empty(path: &str) -> Option<&str> {
    (!path.is_empty()).then_some(path)
}

fn not_found<T>(name: Option<&str>, scopes: &[String]) -> DependencyError {
    DependencyError::not_found(format!(
        "{} ({}, 已尝试作用域: [{}])",
        std::any::type_name::<T>(),
        name.unwrap_or(DEFAULT_SERVICE_NAME),
        scopes.join(", ")
    ))
}
