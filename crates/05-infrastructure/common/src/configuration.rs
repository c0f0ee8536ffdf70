//! 注册表配置
//!
//! 配置来源按优先级从低到高：默认值、TOML 文件、`DI_` 前缀的环境变量。

use crate::errors::ConfigError;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{fs, io};
use tracing::debug;

/// 默认环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "DI";

/// 注册表设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// 单次解析链的最大深度
    pub max_resolution_depth: usize,
    /// 是否以 debug 级别记录每次成功解析
    pub log_resolutions: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            max_resolution_depth: 100,
            log_resolutions: false,
        }
    }
}

impl RegistrySettings {
    /// 从可选的 TOML 文件和 `DI_` 环境变量加载
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env_prefix(path, DEFAULT_ENV_PREFIX)
    }

    /// 使用自定义环境变量前缀加载
    pub fn load_with_env_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            let content = fs::read_to_string(path).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ConfigError::FileNotFound {
                    path: path.display().to_string(),
                },
                _ => ConfigError::from(e),
            })?;
            debug!("加载注册表配置文件: {}", path.display());
            builder = builder.add_source(File::from_str(&content, FileFormat::Toml));
        }

        let settings = builder
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .build()
            .map_err(|e| ConfigError::ParseError { source: Box::new(e) })?;

        let settings: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError { source: Box::new(e) })?;
        settings.validate()?;
        Ok(settings)
    }

    /// 从 TOML 字符串加载（不读取环境变量）
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| ConfigError::ParseError { source: Box::new(e) })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}
