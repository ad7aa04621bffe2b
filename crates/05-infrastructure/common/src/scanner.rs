//! 标记属性扫描
//!
//! [`AttributeScan`] 收集组件声明的参数与资源属性，嵌入的基础组件通过
//! [`AttributeScan::inherit`] 以字段名为前缀递归扫描，构成完整的继承链。
//! [`AnnotationScanner`] 在收集完成后检查重复与不兼容的重新声明。

use crate::component::Component;
use crate::conventions::{NamingConventions, ATTRIBUTE_SEPARATOR};
use crate::errors::{WiringError, WiringResult};
use crate::metadata::FieldShape;
use tracing::debug;

/// 参数标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMarker {
    /// 显式参数名称；缺省时按约定由字段名推导
    pub name: Option<String>,
    /// 参数描述
    pub description: Option<String>,
    /// 是否必需
    pub mandatory: bool,
    /// 默认值的原始编码
    pub default_value: Option<Vec<String>>,
}

impl Default for ParameterMarker {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            mandatory: true,
            default_value: None,
        }
    }
}

impl ParameterMarker {
    /// 创建新的参数标记（默认必需）
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置显式名称
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 设置描述
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 设置是否必需
    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// 设置为可选
    pub fn optional(self) -> Self {
        self.mandatory(false)
    }

    /// 设置默认值编码
    pub fn default_value<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_value = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// 资源标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMarker {
    /// 显式资源键；缺省时按约定由字段名推导
    pub key: Option<String>,
    /// 依赖描述
    pub description: Option<String>,
    /// 是否必需
    pub mandatory: bool,
}

impl Default for ResourceMarker {
    fn default() -> Self {
        Self {
            key: None,
            description: None,
            mandatory: true,
        }
    }
}

impl ResourceMarker {
    /// 创建新的资源标记（默认必需）
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置显式资源键
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// 设置描述
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 设置是否必需
    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// 设置为可选
    pub fn optional(self) -> Self {
        self.mandatory(false)
    }
}

/// 标记属性种类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeKind {
    /// 配置参数
    Parameter {
        /// 字段的 Rust 类型文本
        field_type: String,
        marker: ParameterMarker,
    },
    /// 外部资源依赖
    Resource {
        /// 资源的 Rust 类型名
        resource_type: String,
        marker: ResourceMarker,
    },
}

/// 扫描得到的标记属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedAttribute {
    /// 属性路径
    pub attribute: String,
    /// 声明该属性的类型
    pub declared_in: &'static str,
    /// 继承深度，0 表示组件自身声明
    pub depth: usize,
    /// 属性种类
    pub kind: AttributeKind,
    /// 被本属性覆盖的基础层同名声明
    pub shadowed: Vec<ScannedAttribute>,
}

impl ScannedAttribute {
    /// 逻辑名称：参数名或资源键
    pub fn logical_name(&self) -> String {
        match &self.kind {
            AttributeKind::Parameter { marker, .. } => marker
                .name
                .clone()
                .unwrap_or_else(|| NamingConventions::parameter_name(&self.attribute)),
            AttributeKind::Resource { marker, .. } => marker
                .key
                .clone()
                .unwrap_or_else(|| NamingConventions::resource_key(&self.attribute)),
        }
    }

    /// 是否为参数属性
    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, AttributeKind::Parameter { .. })
    }

    /// 本属性及其覆盖的全部声明
    pub fn declarations(&self) -> impl Iterator<Item = &ScannedAttribute> {
        std::iter::once(self).chain(self.shadowed.iter())
    }

    fn is_compatible_with(&self, other: &ScannedAttribute) -> bool {
        match (&self.kind, &other.kind) {
            (
                AttributeKind::Parameter { field_type: a, .. },
                AttributeKind::Parameter { field_type: b, .. },
            ) => match (FieldShape::classify(a), FieldShape::classify(b)) {
                (Ok(a), Ok(b)) => {
                    a.parameter_type == b.parameter_type && a.multi_valued == b.multi_valued
                }
                _ => a == b,
            },
            (
                AttributeKind::Resource { resource_type: a, .. },
                AttributeKind::Resource { resource_type: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// 属性扫描收集器
#[derive(Debug)]
pub struct AttributeScan {
    owner: &'static str,
    prefix: Vec<String>,
    attributes: Vec<ScannedAttribute>,
}

impl AttributeScan {
    /// 为指定组件类型创建收集器
    pub fn new(owner: &'static str) -> Self {
        Self {
            owner,
            prefix: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// 声明参数属性
    pub fn parameter(
        &mut self,
        attribute: &str,
        field_type: &str,
        marker: ParameterMarker,
    ) -> &mut Self {
        let attribute = self.path(attribute);
        self.push(
            attribute,
            AttributeKind::Parameter {
                field_type: field_type.to_string(),
                marker,
            },
        )
    }

    /// 声明资源属性
    pub fn resource(
        &mut self,
        attribute: &str,
        resource_type: &str,
        marker: ResourceMarker,
    ) -> &mut Self {
        let attribute = self.path(attribute);
        self.push(
            attribute,
            AttributeKind::Resource {
                resource_type: resource_type.to_string(),
                marker,
            },
        )
    }

    /// 扫描嵌入的基础组件，其属性以 `attribute` 为路径前缀
    pub fn inherit<B: Component>(&mut self, attribute: &str) -> &mut Self {
        self.prefix.push(attribute.to_string());
        let owner = std::mem::replace(&mut self.owner, std::any::type_name::<B>());
        B::scan(self);
        self.owner = owner;
        self.prefix.pop();
        self
    }

    /// 已收集的属性
    pub fn attributes(&self) -> &[ScannedAttribute] {
        &self.attributes
    }

    /// 取出已收集的属性
    pub fn into_attributes(self) -> Vec<ScannedAttribute> {
        self.attributes
    }

    fn path(&self, attribute: &str) -> String {
        if self.prefix.is_empty() {
            attribute.to_string()
        } else {
            let separator = ATTRIBUTE_SEPARATOR.to_string();
            format!("{}{}{}", self.prefix.join(&separator), separator, attribute)
        }
    }

    fn push(&mut self, attribute: String, kind: AttributeKind) -> &mut Self {
        self.attributes.push(ScannedAttribute {
            attribute,
            declared_in: self.owner,
            depth: self.prefix.len(),
            kind,
            shadowed: Vec::new(),
        });
        self
    }
}

/// 注解扫描器
///
/// 遍历组件的完整继承链，收集所有标记属性。
#[derive(Debug, Default)]
pub struct AnnotationScanner;

impl AnnotationScanner {
    /// 扫描组件类型
    pub fn scan<C: Component>() -> WiringResult<Vec<ScannedAttribute>> {
        let component = std::any::type_name::<C>();
        let mut scan = AttributeScan::new(component);
        C::scan(&mut scan);
        debug!("扫描组件 {}: 发现 {} 个标记属性", component, scan.attributes().len());
        Self::reconcile(component, scan.into_attributes())
    }

    /// 合并重新声明的属性
    ///
    /// 派生层兼容地重新声明同名属性时覆盖基础层，被覆盖的声明记录在保留属性的
    /// `shadowed` 中；与任一已记录声明同层重名，或不兼容的重新声明，都是错误。
    pub fn reconcile(
        component: &str,
        attributes: Vec<ScannedAttribute>,
    ) -> WiringResult<Vec<ScannedAttribute>> {
        let mut kept: Vec<ScannedAttribute> = Vec::with_capacity(attributes.len());

        for attribute in attributes {
            let name = attribute.logical_name();
            let existing = kept.iter().position(|k| {
                k.is_parameter() == attribute.is_parameter() && k.logical_name() == name
            });

            let Some(index) = existing else {
                kept.push(attribute);
                continue;
            };

            if let Some(clash) = kept[index].declarations().find(|d| d.depth == attribute.depth) {
                return Err(WiringError::configuration_shape(
                    component,
                    &attribute.attribute,
                    format!("名称 {} 与属性 {} 重复", name, clash.attribute),
                ));
            }
            if let Some(other) = kept[index]
                .declarations()
                .find(|d| !d.is_compatible_with(&attribute))
            {
                return Err(WiringError::configuration_shape(
                    component,
                    &attribute.attribute,
                    format!(
                        "名称 {} 在 {} 与 {} 中被不兼容地重新声明",
                        name, other.declared_in, attribute.declared_in
                    ),
                ));
            }

            if attribute.depth < kept[index].depth {
                debug!("属性 {} 覆盖了基础声明 {}", attribute.attribute, kept[index].attribute);
                let mut previous = std::mem::replace(&mut kept[index], attribute);
                let earlier = std::mem::take(&mut previous.shadowed);
                kept[index].shadowed.push(previous);
                kept[index].shadowed.extend(earlier);
            } else {
                debug!("基础声明 {} 被属性 {} 覆盖", attribute.attribute, kept[index].attribute);
                kept[index].shadowed.push(attribute);
            }
        }

        Ok(kept)
    }
}
