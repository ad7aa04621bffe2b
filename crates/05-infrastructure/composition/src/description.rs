//! 组件描述
//!
//! [`PrimitiveDescription`] 描述一个基本组件：组件类型、构造方式与参数覆盖。
//! [`AggregateDescription`] 描述聚合：按键组织的子组件、资源绑定以及对子组件参数的覆盖。
//! 聚合中的基本组件共享所在聚合的上下文前缀，嵌套聚合在其键下形成新的前缀。

use config_impl::{ConfigurationParameters, DescriptorCache};
use di_abstractions::{AssemblyContext, ResourceKeyResolver, ResourceSpecifier};
use di_impl::ResourceBindingGraph;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use wiring_common::{
    AnyComponent, Component, ComponentDescriptor, NamingConventions, WiringError, WiringResult,
    KEY_SEPARATOR,
};

const AGGREGATE_COMPONENT: &str = "AggregateDescription";

type Instantiate = dyn Fn() -> Box<dyn AnyComponent> + Send + Sync;

/// 基本组件描述
#[derive(Clone)]
pub struct PrimitiveDescription {
    descriptor: Arc<ComponentDescriptor>,
    parameters: ConfigurationParameters,
    instantiate: Arc<Instantiate>,
}

impl PrimitiveDescription {
    /// 描述以 `Default` 构造的组件
    pub fn of<C: Component + Default>(cache: &DescriptorCache) -> WiringResult<Self> {
        Self::with_constructor(cache, C::default)
    }

    /// 描述使用自定义构造函数的组件
    pub fn with_constructor<C, F>(cache: &DescriptorCache, constructor: F) -> WiringResult<Self>
    where
        C: Component,
        F: Fn() -> C + Send + Sync + 'static,
    {
        Ok(Self {
            descriptor: cache.get_or_build::<C>()?,
            parameters: ConfigurationParameters::new(),
            instantiate: Arc::new(move || Box::new(constructor()) as Box<dyn AnyComponent>),
        })
    }

    /// 设置参数覆盖（构建器形式）
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_parameter(name, value);
        self
    }

    /// 合并参数覆盖
    pub fn with_parameters(mut self, parameters: &ConfigurationParameters) -> Self {
        self.parameters = self.parameters.merge(parameters);
        self
    }

    /// 设置参数覆盖
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.parameters.set(name, value);
    }

    /// 组件描述符
    pub fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    /// 参数覆盖
    pub fn parameters(&self) -> &ConfigurationParameters {
        &self.parameters
    }

    pub(crate) fn instantiate(&self) -> Box<dyn AnyComponent> {
        (self.instantiate)()
    }
}

impl fmt::Debug for PrimitiveDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveDescription")
            .field("component", &self.descriptor.component_name())
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// 聚合中的子组件描述
#[derive(Debug, Clone)]
pub enum ChildDescription {
    /// 基本组件
    Primitive(PrimitiveDescription),
    /// 嵌套聚合
    Aggregate(AggregateDescription),
}

impl From<PrimitiveDescription> for ChildDescription {
    fn from(description: PrimitiveDescription) -> Self {
        Self::Primitive(description)
    }
}

impl From<AggregateDescription> for ChildDescription {
    fn from(description: AggregateDescription) -> Self {
        Self::Aggregate(description)
    }
}

#[derive(Debug, Clone)]
struct ResourceBinding {
    child_path: Vec<String>,
    local_key: String,
    specifier: ResourceSpecifier,
}

/// 聚合描述
#[derive(Debug, Clone, Default)]
pub struct AggregateDescription {
    children: Vec<(String, ChildDescription)>,
    bindings: Vec<ResourceBinding>,
}

impl AggregateDescription {
    /// 创建空聚合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加子组件
    ///
    /// 子组件键必须是有效的键段且在聚合内唯一。
    pub fn with_child(
        mut self,
        key: impl Into<String>,
        child: impl Into<ChildDescription>,
    ) -> WiringResult<Self> {
        let key = key.into();
        if !NamingConventions::is_valid_key_segment(&key) {
            return Err(WiringError::configuration_shape(
                AGGREGATE_COMPONENT,
                &key,
                "无效的子组件键",
            ));
        }
        if self.child(&key).is_some() {
            return Err(WiringError::configuration_shape(
                AGGREGATE_COMPONENT,
                &key,
                "子组件键重复",
            ));
        }
        self.children.push((key, child.into()));
        Ok(self)
    }

    /// 在聚合自身的上下文中绑定资源
    pub fn bind_resource(self, local_key: impl Into<String>, specifier: ResourceSpecifier) -> Self {
        self.bind_resource_for(&[], local_key, specifier)
    }

    /// 针对嵌套聚合中组件的本地键绑定资源
    ///
    /// `child_path` 是从本聚合到目标组件所在嵌套聚合的子键路径。
    pub fn bind_resource_for(
        mut self,
        child_path: &[&str],
        local_key: impl Into<String>,
        specifier: ResourceSpecifier,
    ) -> Self {
        self.bindings.push(ResourceBinding {
            child_path: child_path.iter().map(|s| s.to_string()).collect(),
            local_key: local_key.into(),
            specifier,
        });
        self
    }

    /// 覆盖子组件的参数（构建器形式）
    pub fn with_parameter(
        mut self,
        child_path: &str,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> WiringResult<Self> {
        self.set_parameter(child_path, name, value)?;
        Ok(self)
    }

    /// 覆盖子组件的参数
    ///
    /// `child_path` 是点分的子组件路径，必须指向一个基本组件。
    pub fn set_parameter(
        &mut self,
        child_path: &str,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> WiringResult<()> {
        let (head, rest) = match child_path.split_once(KEY_SEPARATOR) {
            Some((head, rest)) => (head, Some(rest)),
            None => (child_path, None),
        };

        let child = self
            .children
            .iter_mut()
            .find(|(key, _)| key == head)
            .map(|(_, child)| child)
            .ok_or_else(|| {
                WiringError::configuration_shape(AGGREGATE_COMPONENT, child_path, "子组件不存在")
            })?;

        match (child, rest) {
            (ChildDescription::Primitive(primitive), None) => {
                primitive.set_parameter(name, value);
                Ok(())
            }
            (ChildDescription::Aggregate(aggregate), Some(rest)) => {
                aggregate.set_parameter(rest, name, value)
            }
            _ => Err(WiringError::configuration_shape(
                AGGREGATE_COMPONENT,
                child_path,
                "路径未指向基本组件",
            )),
        }
    }

    /// 按键获取子组件
    pub fn child(&self, key: &str) -> Option<&ChildDescription> {
        self.children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, child)| child)
    }

    /// 子组件键（按添加顺序）
    pub fn child_keys(&self) -> Vec<&str> {
        self.children.iter().map(|(key, _)| key.as_str()).collect()
    }

    /// 子组件
    pub fn children(&self) -> &[(String, ChildDescription)] {
        &self.children
    }

    /// 基本组件总数（含嵌套聚合）
    pub fn primitive_count(&self) -> usize {
        self.children
            .iter()
            .map(|(_, child)| match child {
                ChildDescription::Primitive(_) => 1,
                ChildDescription::Aggregate(aggregate) => aggregate.primitive_count(),
            })
            .sum()
    }

    /// 将本聚合及所有嵌套聚合的资源绑定注册到图中
    pub fn register_resources(
        &self,
        context: &AssemblyContext,
        graph: &mut ResourceBindingGraph,
    ) -> WiringResult<()> {
        for binding in &self.bindings {
            let child_path: Vec<&str> = binding.child_path.iter().map(String::as_str).collect();
            let key = ResourceKeyResolver::qualify_external(context, &child_path, &binding.local_key);
            graph.bind(key, binding.specifier.clone())?;
        }

        for (key, child) in &self.children {
            if let ChildDescription::Aggregate(aggregate) = child {
                aggregate.register_resources(&context.child(key), graph)?;
            }
        }
        Ok(())
    }
}
