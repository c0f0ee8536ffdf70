//! 协作者与配置的集成测试

use async_trait::async_trait;
use di_abstractions::{Debouncer, ResolveContext, ResourceCache, SecretStore, ServiceRegistryExt};
use di_impl::{DeviceIdentity, InMemorySecretStore, ServiceRegistryImpl, TokioDebouncer};
use di_impl_integration_tests::init_test_logger;
use infrastructure_common::{CollaboratorError, ConfigError, RegistrySettings};
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 记录网络访问次数的资源缓存
#[derive(Default)]
struct RecordingCache {
    entries: tokio::sync::Mutex<HashMap<String, Vec<u8>>>,
    network_fetches: AtomicUsize,
}

#[async_trait]
impl ResourceCache for RecordingCache {
    async fn fetch(&self, url: &str, headers: &HashMap<String, String>) -> Result<Vec<u8>, CollaboratorError> {
        if url.is_empty() {
            return Err(CollaboratorError::Unavailable {
                resource: url.to_string(),
                message: "空 URL".to_string(),
            });
        }

        let mut entries = self.entries.lock().await;
        if let Some(body) = entries.get(url) {
            return Ok(body.clone());
        }

        self.network_fetches.fetch_add(1, Ordering::SeqCst);
        let accept = headers.get("accept").map_or("*/*", String::as_str);
        let body = format!("{accept} {url}").into_bytes();
        entries.insert(url.to_string(), body.clone());
        Ok(body)
    }

    async fn invalidate(&self, url: &str) -> Result<(), CollaboratorError> {
        self.entries.lock().await.remove(url);
        Ok(())
    }
}

/// 依赖资源缓存的服务
struct AvatarLoader {
    cache: Arc<dyn ResourceCache>,
}

impl AvatarLoader {
    fn url(user: &str) -> String {
        format!("https://avatars.test/{user}")
    }

    async fn load(&self, user: &str) -> Result<Vec<u8>, CollaboratorError> {
        let headers = HashMap::from([("accept".to_string(), "image/png".to_string())]);
        self.cache.fetch(&Self::url(user), &headers).await
    }
}

#[tokio::test]
async fn test_resource_cache_behind_factory() -> anyhow::Result<()> {
    init_test_logger();
    let cache = Arc::new(RecordingCache::default());
    let registry = ServiceRegistryImpl::new();
    registry.register_value::<Arc<dyn ResourceCache>>(None, None, cache.clone());
    registry.register(None, Some("profile"), |ctx: &mut ResolveContext<'_>| {
        let cache = ctx.resolve::<Arc<dyn ResourceCache>>(None, None)?;
        Ok(AvatarLoader {
            cache: (*cache).clone(),
        })
    });

    let loader = registry.resolve::<AvatarLoader>(None, Some("profile"))?;
    let body = loader.load("alice").await?;
    assert_eq!(body, b"image/png https://avatars.test/alice");
    loader.load("alice").await?;
    assert_eq!(cache.network_fetches.load(Ordering::SeqCst), 1);

    // 失效后重新访问网络，使用新解析的服务实例也共享同一个缓存
    cache.invalidate(&AvatarLoader::url("alice")).await?;
    let loader = registry.resolve::<AvatarLoader>(None, Some("profile"))?;
    loader.load("alice").await?;
    assert_eq!(cache.network_fetches.load(Ordering::SeqCst), 2);

    let err = loader.cache.fetch("", &HashMap::new()).await.unwrap_err();
    assert!(matches!(err, CollaboratorError::Unavailable { .. }));
    Ok(())
}

/// 通过注册表组装设备标识，工厂依赖密钥存储
#[test]
fn test_device_identity_from_registry() -> anyhow::Result<()> {
    init_test_logger();
    let registry = ServiceRegistryImpl::new();
    let store: Arc<dyn SecretStore> = Arc::new(InMemorySecretStore::new());
    registry.register_value(None, None, store);
    registry.register(None, None, |ctx: &mut ResolveContext<'_>| {
        let store = ctx.resolve::<Arc<dyn SecretStore>>(None, None)?;
        Ok(DeviceIdentity::new((*store).clone()))
    });

    let first = registry.resolve::<DeviceIdentity>(None, None)?.device_id()?;
    let second = registry.resolve::<DeviceIdentity>(None, None)?.device_id()?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_shared_debouncer_from_registry() -> anyhow::Result<()> {
    let registry = ServiceRegistryImpl::new();
    registry.register_value(None, Some("search"), TokioDebouncer::new()?);

    let fired = Arc::new(AtomicUsize::new(0));
    for _ in 0..5 {
        let debouncer = registry.resolve::<TokioDebouncer>(None, Some("search"))?;
        let fired = Arc::clone(&fired);
        debouncer.schedule(
            Duration::from_millis(20),
            Box::new(move || {
                fired.fetch_add(1, Ordering::SeqCst);
            }),
        );
    }

    tokio::time::advance(Duration::from_millis(19)).await;
    tokio::task::yield_now().await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    tokio::time::advance(Duration::from_millis(1)).await;
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_settings_file_and_environment() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "max_resolution_depth = 8")?;
    writeln!(file, "log_resolutions = false")?;

    std::env::set_var("DI_INTEGRATION_LOG_RESOLUTIONS", "true");
    let settings = RegistrySettings::load_with_env_prefix(Some(file.path()), "DI_INTEGRATION")?;
    std::env::remove_var("DI_INTEGRATION_LOG_RESOLUTIONS");

    assert_eq!(settings.max_resolution_depth, 8);
    assert!(settings.log_resolutions);

    let registry = ServiceRegistryImpl::with_settings(settings);
    assert_eq!(registry.settings().max_resolution_depth, 8);
    Ok(())
}

#[test]
fn test_settings_defaults_without_sources() {
    let settings = RegistrySettings::load_with_env_prefix(None, "DI_INTEGRATION_UNSET").unwrap();
    assert_eq!(settings, RegistrySettings::default());

    let err = RegistrySettings::load(Some(std::path::Path::new("missing/registry.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}
