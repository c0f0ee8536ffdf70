//! 服务注册表实现

use di_abstractions::{
    Registration, ResolveOptions, ServiceFactory, ServiceKey, ServiceLookup, ServiceRegistry,
};
use infrastructure_common::RegistrySettings;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use tracing::{debug, info};

/// 作用域内的键：类型 + 名称
type LocalKey = (TypeId, String);

#[derive(Default)]
struct RegistryMaps {
    /// 全局注册
    global: HashMap<LocalKey, Registration>,
    /// 作用域注册，空作用域会被移除
    scoped: HashMap<String, HashMap<LocalKey, Registration>>,
}

impl RegistryMaps {
    fn get(&self, key: &ServiceKey) -> Option<&Registration> {
        let local = local_key(key);
        match key.scope() {
            Some(scope) => self.scoped.get(scope)?.get(&local),
            None => self.global.get(&local),
        }
    }

    fn len(&self) -> usize {
        self.global.len() + self.scoped.values().map(HashMap::len).sum::<usize>()
    }
}

fn local_key(key: &ServiceKey) -> LocalKey {
    (key.type_id(), key.name().to_string())
}

/// 具体的服务注册表实现
///
/// 读写锁只在访问映射期间持有。工厂在锁释放后调用，
/// 因此工厂内部可以继续解析甚至注册服务。
pub struct ServiceRegistryImpl {
    maps: RwLock<RegistryMaps>,
    settings: RegistrySettings,
}

impl ServiceRegistryImpl {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self::with_settings(RegistrySettings::default())
    }

    /// 使用指定设置创建注册表
    pub fn with_settings(settings: RegistrySettings) -> Self {
        Self {
            maps: RwLock::new(RegistryMaps::default()),
            settings,
        }
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }
}

impl Default for ServiceRegistryImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServiceRegistryImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let maps = self.maps.read();
        f.debug_struct("ServiceRegistryImpl")
            .field("global_count", &maps.global.len())
            .field("scopes", &maps.scoped.keys().collect::<Vec<_>>())
            .field("settings", &self.settings)
            .finish()
    }
}

impl ServiceLookup for ServiceRegistryImpl {
    fn factory_for(&self, key: &ServiceKey) -> Option<ServiceFactory> {
        self.maps.read().get(key).map(|reg| reg.factory.clone())
    }

    fn log_resolutions(&self) -> bool {
        self.settings.log_resolutions
    }
}

impl ServiceRegistry for ServiceRegistryImpl {
    fn as_lookup(&self) -> &dyn ServiceLookup {
        self
    }

    fn register_erased(&self, key: ServiceKey, factory: ServiceFactory) {
        let local = local_key(&key);
        let registration = Registration::new(key.clone(), factory);

        let mut maps = self.maps.write();
        let previous = match key.scope() {
            Some(scope) => maps
                .scoped
                .entry(scope.to_string())
                .or_default()
                .insert(local, registration),
            None => maps.global.insert(local, registration),
        };
        drop(maps);

        if previous.is_some() {
            debug!(key = %key, "替换已有注册");
        } else {
            debug!(key = %key, "注册服务");
        }
    }

    fn remove_key(&self, key: &ServiceKey) -> bool {
        let local = local_key(key);
        let mut maps = self.maps.write();

        let removed = match key.scope() {
            Some(scope) => {
                let Some(entries) = maps.scoped.get_mut(scope) else {
                    return false;
                };
                let removed = entries.remove(&local).is_some();
                if entries.is_empty() {
                    maps.scoped.remove(scope);
                    debug!(scope, "作用域已空，移除");
                }
                removed
            }
            None => maps.global.remove(&local).is_some(),
        };
        drop(maps);

        if removed {
            debug!(key = %key, "删除注册");
        }
        removed
    }

    fn contains_key(&self, key: &ServiceKey) -> bool {
        self.maps.read().get(key).is_some()
    }

    fn clear_scope(&self, scope: &str) {
        if let Some(entries) = self.maps.write().scoped.remove(scope) {
            info!(scope, count = entries.len(), "清理作用域");
        }
    }

    fn clear(&self) {
        let mut maps = self.maps.write();
        let count = maps.len();
        *maps = RegistryMaps::default();
        drop(maps);
        info!(count, "清理所有注册");
    }

    fn registered_keys(&self) -> Vec<ServiceKey> {
        let maps = self.maps.read();
        maps.global
            .values()
            .chain(maps.scoped.values().flat_map(HashMap::values))
            .map(|reg| reg.key.clone())
            .collect()
    }

    fn scopes(&self) -> Vec<String> {
        let mut scopes: Vec<String> = self.maps.read().scoped.keys().cloned().collect();
        scopes.sort();
        scopes
    }

    fn registration_count(&self) -> usize {
        self.maps.read().len()
    }

    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_depth: self.settings.max_resolution_depth,
        }
    }
}
