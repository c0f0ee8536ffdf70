//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    /// 没有可用的注册，或工厂产出的值无法转换成请求的类型
    #[error("服务未找到: {descriptor}")]
    ServiceNotFound { descriptor: String },

    /// 解析链中出现重复的键
    #[error("循环依赖检测到: {}", .chain.join(" → "))]
    CircularDependency { chain: Vec<String> },

    #[error("解析深度超过上限 {depth}: {key}")]
    ResolutionDepthExceeded { depth: usize, key: String },

    #[error("服务创建失败: {type_name}, 原因: {source}")]
    FactoryFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DependencyError {
    /// 创建服务未找到错误
    pub fn not_found(descriptor: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            descriptor: descriptor.into(),
        }
    }

    /// 供工厂作者包装自身错误
    pub fn factory_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::FactoryFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 是否为可回退的未找到错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ServiceNotFound { .. })
    }

    /// 是否为循环依赖错误
    pub fn is_circular(&self) -> bool {
        matches!(self, Self::CircularDependency { .. })
    }
}

/// 外部协作者错误类型
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("资源不可用: {resource}, 原因: {message}")]
    Unavailable { resource: String, message: String },

    #[error("存储操作失败: {key}, 原因: {message}")]
    StorageFailed { key: String, message: String },

    #[error("调度失败: {message}")]
    SchedulingFailed { message: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("协作者错误: {source}")]
    CollaboratorError {
        #[from]
        source: CollaboratorError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
