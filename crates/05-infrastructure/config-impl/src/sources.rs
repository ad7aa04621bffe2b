//! 参数来源
//!
//! 通过 `config` crate 叠加配置文件与环境变量，读取某个配置节作为组件参数覆盖。
//! 后添加的来源优先。

use crate::parameters::ConfigurationParameters;
use config::{Config, Environment, File};
use std::path::PathBuf;
use tracing::{debug, error};
use wiring_common::{WiringError, WiringResult};

/// 环境变量层级分隔符的默认值
pub const DEFAULT_ENV_SEPARATOR: &str = "__";

/// 分层参数来源
#[derive(Debug, Clone, Default)]
pub struct ParameterSource {
    files: Vec<(PathBuf, bool)>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
}

impl ParameterSource {
    /// 创建空来源
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加必需的配置文件，格式按扩展名识别
    pub fn add_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push((path.into(), true));
        self
    }

    /// 添加可选的配置文件，文件不存在时跳过
    pub fn add_optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push((path.into(), false));
        self
    }

    /// 添加带前缀的环境变量来源，如 `WIRING__CLASSIFIER__THRESHOLD`
    pub fn add_env(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 设置环境变量层级分隔符
    pub fn env_separator(mut self, separator: impl Into<String>) -> Self {
        self.env_separator = Some(separator.into());
        self
    }

    /// 读取配置节；节名为空时读取全部顶层键
    pub fn load(&self, section: &str) -> WiringResult<ConfigurationParameters> {
        let mut builder = Config::builder();
        for (path, required) in &self.files {
            builder = builder.add_source(File::from(path.as_path()).required(*required));
        }
        if let Some(prefix) = &self.env_prefix {
            let separator = self
                .env_separator
                .as_deref()
                .unwrap_or(DEFAULT_ENV_SEPARATOR);
            builder = builder.add_source(Environment::with_prefix(prefix).separator(separator));
        }

        let settings = builder.build().map_err(|e| {
            error!("配置构建失败: {}", e);
            WiringError::configuration_source(e.to_string())
        })?;

        let value: serde_json::Value = if section.is_empty() {
            settings.try_deserialize()
        } else {
            settings.get(section)
        }
        .map_err(|e| {
            error!("配置节读取失败: section={}, error={}", section, e);
            WiringError::configuration_source(format!("{}: {}", section, e))
        })?;

        let parameters = ConfigurationParameters::from_json(&value)?;
        debug!("读取配置节 {}: {} 个参数", section, parameters.len());
        Ok(parameters)
    }
}
