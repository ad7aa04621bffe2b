//! 错误类型定义

use thiserror::Error;

/// 组件钩子（初始化、资源加载）返回的通用错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 单个值无法按声明的语义类型解释
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("期望 {expected}, 实际 {actual}")]
pub struct ValueMismatch {
    /// 期望的类型描述
    pub expected: String,
    /// 实际得到的值或类型描述
    pub actual: String,
}

impl ValueMismatch {
    /// 创建新的类型不匹配描述
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// 装配错误类型
///
/// 覆盖描述符构建、配置绑定、资源图构建与资源注入的全部失败情形。
/// 所有错误对出错组件都是终止性的，由装配调用方处理。
#[derive(Error, Debug)]
pub enum WiringError {
    #[error("组件 {component} 的属性 {attribute} 声明无效: {message}")]
    ConfigurationShape {
        component: String,
        attribute: String,
        message: String,
    },

    #[error("组件 {component} 缺少必需参数: {parameter}")]
    MissingMandatoryParameter { component: String, parameter: String },

    #[error("组件 {component} 的参数 {parameter} 类型不匹配: {mismatch}")]
    TypeMismatch {
        component: String,
        parameter: String,
        mismatch: ValueMismatch,
    },

    #[error("组件 {component} 依赖的资源未绑定: {key}")]
    UnboundResource { component: String, key: String },

    #[error("资源键重复绑定: {key}")]
    DuplicateBinding { key: String },

    #[error("组件 {component} 的属性 {attribute} 没有可写的绑定目标")]
    BindingTarget { component: String, attribute: String },

    #[error("资源构建失败: {key}, 原因: {source}")]
    ResourceCreationFailed { key: String, source: BoxError },

    #[error("检测到资源循环依赖: {chain}")]
    CircularResourceDependency { chain: String },

    #[error("组件初始化失败: {component}, 原因: {source}")]
    InitializationFailed { component: String, source: BoxError },

    #[error("配置源加载失败: {message}")]
    ConfigurationSource { message: String },
}

impl WiringError {
    /// 创建声明形态错误
    pub fn configuration_shape(
        component: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ConfigurationShape {
            component: component.into(),
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// 创建必需参数缺失错误
    pub fn missing_parameter(component: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingMandatoryParameter {
            component: component.into(),
            parameter: parameter.into(),
        }
    }

    /// 创建类型不匹配错误
    pub fn type_mismatch(
        component: impl Into<String>,
        parameter: impl Into<String>,
        mismatch: ValueMismatch,
    ) -> Self {
        Self::TypeMismatch {
            component: component.into(),
            parameter: parameter.into(),
            mismatch,
        }
    }

    /// 创建资源未绑定错误
    pub fn unbound_resource(component: impl Into<String>, key: impl Into<String>) -> Self {
        Self::UnboundResource {
            component: component.into(),
            key: key.into(),
        }
    }

    /// 创建重复绑定错误
    pub fn duplicate_binding(key: impl Into<String>) -> Self {
        Self::DuplicateBinding { key: key.into() }
    }

    /// 创建绑定目标缺失错误
    pub fn binding_target(component: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::BindingTarget {
            component: component.into(),
            attribute: attribute.into(),
        }
    }

    /// 创建配置源错误
    pub fn configuration_source(message: impl Into<String>) -> Self {
        Self::ConfigurationSource {
            message: message.into(),
        }
    }
}

/// 结果类型别名
pub type WiringResult<T> = Result<T, WiringError>;
