//! 日志配置

use tracing::info;
use tracing_subscriber::EnvFilter;
use wiring_common::{WiringError, WiringResult};

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
    /// 是否优先使用 `RUST_LOG` 环境变量中的过滤规则
    pub respect_env_filter: bool,
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
            respect_env_filter: true,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
            respect_env_filter: true,
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
            respect_env_filter: false,
        }
    }

    fn filter(&self) -> EnvFilter {
        let default_directive = self.level.to_string().to_lowercase();
        if self.respect_env_filter {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
        } else {
            EnvFilter::new(default_directive)
        }
    }
}

/// 初始化全局日志订阅器
///
/// 已安装全局订阅器时返回 `ConfigurationSource` 错误。
pub fn init_logging(config: &LoggingConfig) -> WiringResult<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| WiringError::configuration_source(format!("日志初始化失败: {}", e)))?;

    info!("日志系统初始化完成");
    Ok(())
}
