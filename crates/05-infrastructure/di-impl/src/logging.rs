//! 日志初始化
//!
//! 过滤规则优先取 `RUST_LOG`，其次是配置中的指令，最后是配置的日志级别。

use infrastructure_common::InfrastructureError;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
    /// 额外的过滤指令，如 `di_impl=trace`
    pub directives: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
            directives: None,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置，可以看到解析栈的 trace 事件
    pub fn development() -> Self {
        Self {
            level: tracing::Level::TRACE,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
            directives: Some("di_abstractions=trace,di_impl=trace".to_string()),
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
            directives: None,
        }
    }

    /// 构建过滤器，`RUST_LOG` 存在时覆盖配置
    pub fn env_filter(&self) -> Result<EnvFilter, InfrastructureError> {
        self.filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
    }

    fn filter_from(&self, env: Option<&str>) -> Result<EnvFilter, InfrastructureError> {
        let directives = env
            .filter(|value| !value.trim().is_empty())
            .or(self.directives.as_deref())
            .unwrap_or_default();

        EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.level).into())
            .parse(directives)
            .map_err(|e| InfrastructureError::BootstrapFailed {
                message: format!("无效的日志过滤指令 {directives}: {e}"),
            })
    }
}

/// 初始化全局日志订阅者
///
/// 已有全局订阅者时返回 [`InfrastructureError::BootstrapFailed`]。
pub fn init_logging(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {e}"),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}
