//! 描述符构建器
//!
//! 把扫描得到的标记属性转换为参数描述符与资源依赖。
//! 默认值在构建阶段即被解析，无法解析的默认值会让描述符构建失败。

use crate::coercer::ValueCoercer;
use tracing::{debug, info};
use wiring_common::{
    AnnotationScanner, AttributeKind, Component, ComponentDescriptor, FieldShape,
    NamingConventions, ParameterDescriptor, ResourceDependency, ScannedAttribute,
    ShadowedAttribute, TypeInfo, WiringError, WiringResult,
};

/// 参数描述符构建器
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterDescriptorBuilder {
    coercer: ValueCoercer,
}

impl ParameterDescriptorBuilder {
    /// 创建新的参数描述符构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 由参数属性构建描述符
    pub fn build(
        &self,
        component: &str,
        attribute: &ScannedAttribute,
    ) -> WiringResult<ParameterDescriptor> {
        let AttributeKind::Parameter { field_type, marker } = &attribute.kind else {
            return Err(WiringError::configuration_shape(
                component,
                &attribute.attribute,
                "不是参数属性",
            ));
        };

        let shape = FieldShape::classify(field_type)
            .map_err(|message| WiringError::configuration_shape(component, &attribute.attribute, message))?;

        let name = attribute.logical_name();
        if name.is_empty() {
            return Err(WiringError::configuration_shape(
                component,
                &attribute.attribute,
                "参数名称不能为空",
            ));
        }

        let shadowed = attribute
            .shadowed
            .iter()
            .map(|base| {
                let AttributeKind::Parameter { field_type, .. } = &base.kind else {
                    return Err(WiringError::configuration_shape(
                        component,
                        &base.attribute,
                        "不是参数属性",
                    ));
                };
                let base_shape = FieldShape::classify(field_type).map_err(|message| {
                    WiringError::configuration_shape(component, &base.attribute, message)
                })?;
                Ok(ShadowedAttribute {
                    attribute: base.attribute.clone(),
                    scalar_type: base_shape.scalar_type,
                })
            })
            .collect::<WiringResult<Vec<_>>>()?;

        let mut descriptor = ParameterDescriptor {
            name,
            description: marker.description.clone(),
            parameter_type: shape.parameter_type,
            multi_valued: shape.multi_valued,
            mandatory: marker.mandatory,
            default_value: marker.default_value.clone(),
            coerced_default: None,
            attribute: attribute.attribute.clone(),
            scalar_type: shape.scalar_type,
            shadowed,
            declared_in: attribute.declared_in.to_string(),
        };

        descriptor.coerced_default = match &marker.default_value {
            Some(raw) => Some(
                self.coercer
                    .decode_parameter_default(&descriptor, raw)
                    .map_err(|mismatch| {
                        WiringError::configuration_shape(
                            component,
                            &attribute.attribute,
                            format!("默认值无法解析: {}", mismatch),
                        )
                    })?,
            ),
            None => None,
        };

        Ok(descriptor)
    }
}

/// 组件描述符构建器
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentDescriptorBuilder {
    parameters: ParameterDescriptorBuilder,
}

impl ComponentDescriptorBuilder {
    /// 创建新的组件描述符构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 扫描组件类型并构建描述符
    pub fn build<C: Component>(&self) -> WiringResult<ComponentDescriptor> {
        let attributes = AnnotationScanner::scan::<C>()?;
        self.build_from_attributes(TypeInfo::of::<C>(), attributes)
    }

    /// 由已收集的属性构建描述符
    pub fn build_from_attributes(
        &self,
        type_info: TypeInfo,
        attributes: Vec<ScannedAttribute>,
    ) -> WiringResult<ComponentDescriptor> {
        let component = type_info.module_path.clone();
        let attributes = AnnotationScanner::reconcile(&component, attributes)?;

        let mut parameters = Vec::new();
        let mut resources = Vec::new();

        for attribute in &attributes {
            match &attribute.kind {
                AttributeKind::Parameter { .. } => {
                    parameters.push(self.parameters.build(&component, attribute)?);
                }
                AttributeKind::Resource {
                    resource_type,
                    marker,
                } => {
                    let key = attribute.logical_name();
                    if !NamingConventions::is_valid_key_segment(&key) {
                        return Err(WiringError::configuration_shape(
                            &component,
                            &attribute.attribute,
                            format!("无效的资源键: {:?}", key),
                        ));
                    }
                    resources.push(ResourceDependency {
                        key,
                        attribute: attribute.attribute.clone(),
                        mandatory: marker.mandatory,
                        resource_type: resource_type.clone(),
                        description: marker.description.clone(),
                        shadowed: attribute
                            .shadowed
                            .iter()
                            .map(|base| base.attribute.clone())
                            .collect(),
                        declared_in: attribute.declared_in.to_string(),
                    });
                }
            }
        }

        for parameter in &parameters {
            debug!(
                "参数 {}.{}: {} mandatory={} default={:?}",
                type_info.short_name(),
                parameter.name,
                parameter.type_label(),
                parameter.mandatory,
                parameter.default_value
            );
        }
        info!(
            "构建组件描述符: {} ({} 个参数, {} 个资源依赖)",
            component,
            parameters.len(),
            resources.len()
        );

        Ok(ComponentDescriptor {
            type_info,
            parameters,
            resources,
        })
    }
}
