//! 外部协作者接口
//!
//! 工厂可能依赖的外围能力：远程资源缓存、小型密钥存储、防抖定时器。

use async_trait::async_trait;
use infrastructure_common::CollaboratorError;
use std::collections::HashMap;
use std::time::Duration;

/// 远程资源缓存
#[async_trait]
pub trait ResourceCache: Send + Sync {
    /// 按 URL 和请求头获取资源，命中缓存时不访问网络
    async fn fetch(&self, url: &str, headers: &HashMap<String, String>) -> Result<Vec<u8>, CollaboratorError>;

    /// 使缓存条目失效
    async fn invalidate(&self, url: &str) -> Result<(), CollaboratorError>;
}

/// 跨进程重启保存的小型密钥存储
pub trait SecretStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CollaboratorError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CollaboratorError>;

    fn remove(&self, key: &str) -> Result<(), CollaboratorError>;
}

/// 延迟回调
pub type DeferredCallback = Box<dyn FnOnce() + Send + 'static>;

/// 防抖定时器
///
/// 新的调度会取消尚未执行的旧回调。
pub trait Debouncer: Send + Sync {
    /// 在 `delay` 后执行回调，替换挂起的回调
    fn schedule(&self, delay: Duration, callback: DeferredCallback);

    /// 取消挂起的回调
    fn cancel(&self);

    /// 是否有挂起的回调
    fn is_pending(&self) -> bool;
}
