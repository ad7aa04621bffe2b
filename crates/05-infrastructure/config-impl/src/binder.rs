//! 配置绑定器
//!
//! 按组件描述符为每个参数确定最终值（覆盖值优先，其次默认值），
//! 全部值确定后再写入组件实例。转换与字段宽度检查都在确定阶段完成，
//! 任何参数失败都不会写入任何字段。

use crate::coercer::ValueCoercer;
use crate::parameters::ConfigurationParameters;
use tracing::{debug, warn};
use wiring_common::{Component, ComponentDescriptor, ParameterValue, WiringError, WiringResult};

/// 参数值的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    /// 调用方提供的覆盖值
    Override,
    /// 声明的默认值
    Default,
}

/// 已确定的参数值
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParameter {
    /// 参数名称
    pub name: String,
    /// 目标属性路径
    pub attribute: String,
    /// 被覆盖的基础属性路径，写入同一个值
    pub shadowed: Vec<String>,
    /// 转换后的值
    pub value: ParameterValue,
    /// 值来源
    pub origin: ValueOrigin,
}

/// 组件的已确定配置
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfiguration {
    /// 有值的参数（按声明顺序）
    pub parameters: Vec<ResolvedParameter>,
}

impl ResolvedConfiguration {
    /// 按参数名获取值
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// 按参数名获取值来源
    pub fn origin(&self, name: &str) -> Option<ValueOrigin> {
        self.parameters.iter().find(|p| p.name == name).map(|p| p.origin)
    }
}

/// 配置绑定器
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurationBinder {
    coercer: ValueCoercer,
}

impl ConfigurationBinder {
    /// 创建新的配置绑定器
    pub fn new() -> Self {
        Self::default()
    }

    /// 确定每个参数的值，不修改任何实例
    pub fn resolve(
        &self,
        descriptor: &ComponentDescriptor,
        parameters: &ConfigurationParameters,
    ) -> WiringResult<ResolvedConfiguration> {
        let component = descriptor.component_name();

        for name in parameters.names() {
            if descriptor.parameter(name).is_none() {
                warn!("忽略未声明的参数: {} -> {}", name, component);
            }
        }

        let mut resolved = ResolvedConfiguration::default();
        for parameter in &descriptor.parameters {
            let value = match parameters.get(&parameter.name) {
                Some(raw) => {
                    let value = self
                        .coercer
                        .coerce_parameter(parameter, raw)
                        .map_err(|mismatch| {
                            WiringError::type_mismatch(component, &parameter.name, mismatch)
                        })?;
                    Some((value, ValueOrigin::Override))
                }
                None => parameter
                    .coerced_default
                    .clone()
                    .map(|value| (value, ValueOrigin::Default)),
            };

            match value {
                Some((value, origin)) => resolved.parameters.push(ResolvedParameter {
                    name: parameter.name.clone(),
                    attribute: parameter.attribute.clone(),
                    shadowed: parameter
                        .shadowed
                        .iter()
                        .map(|base| base.attribute.clone())
                        .collect(),
                    value,
                    origin,
                }),
                None if parameter.mandatory => {
                    return Err(WiringError::missing_parameter(component, &parameter.name));
                }
                None => debug!("可选参数 {} 未提供值, 保持字段原值", parameter.name),
            }
        }

        Ok(resolved)
    }

    /// 确定参数值并写入组件实例
    pub fn bind<C: Component + ?Sized>(
        &self,
        instance: &mut C,
        descriptor: &ComponentDescriptor,
        parameters: &ConfigurationParameters,
    ) -> WiringResult<ResolvedConfiguration> {
        let resolved = self.resolve(descriptor, parameters)?;

        for parameter in &resolved.parameters {
            instance.apply_parameter(&parameter.attribute, &parameter.value)?;
            for base in &parameter.shadowed {
                instance.apply_parameter(base, &parameter.value)?;
            }
        }

        debug!(
            "绑定配置: {} ({} 个参数已写入)",
            descriptor.component_name(),
            resolved.parameters.len()
        );
        Ok(resolved)
    }
}
