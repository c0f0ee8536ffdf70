//! 密钥存储与设备标识

use dashmap::DashMap;
use di_abstractions::SecretStore;
use infrastructure_common::CollaboratorError;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 设备标识在密钥存储中的键
pub const DEVICE_ID_KEY: &str = "device_id";

/// 进程内密钥存储
///
/// 生命周期与进程相同，用于测试和没有系统钥匙串的宿主。
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    entries: DashMap<String, String>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for InMemorySecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, CollaboratorError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CollaboratorError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CollaboratorError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// 设备标识
///
/// 首次访问时生成 UUID 并写入存储，之后始终返回同一个值。
pub struct DeviceIdentity {
    store: Arc<dyn SecretStore>,
    creation: Mutex<()>,
}

impl DeviceIdentity {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            creation: Mutex::new(()),
        }
    }

    /// 获取或创建设备标识
    pub fn device_id(&self) -> Result<String, CollaboratorError> {
        if let Some(id) = self.store.get(DEVICE_ID_KEY)? {
            return Ok(id);
        }

        let _guard = self.creation.lock();
        if let Some(id) = self.store.get(DEVICE_ID_KEY)? {
            return Ok(id);
        }

        let id = Uuid::new_v4().to_string();
        self.store.set(DEVICE_ID_KEY, &id)?;
        info!("生成新的设备标识");
        Ok(id)
    }
}

impl std::fmt::Debug for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceIdentity").finish_non_exhaustive()
    }
}
