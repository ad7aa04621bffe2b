//! 基于组件类型的资源说明
//!
//! 资源类型本身也是组件：构建时先绑定构建参数，再注入它依赖的其他资源，
//! 最后调用一次 `load`。资源自身依赖的键相对于它被绑定的键所在的上下文解析。

use crate::injector::ResourceInjector;
use config_impl::{ConfigurationBinder, ConfigurationParameters, DescriptorCache};
use di_abstractions::{ResourceFactory, ResourceKeyResolver, ResourceLookup, ResourceSpecifier};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::info;
use wiring_common::{
    ComponentDescriptor, DataResource, ResourceDependency, SharedResource, SharedResourceObject,
    WiringError, WiringResult,
};

type Constructor<T> = Box<dyn Fn() -> T + Send + Sync>;

/// 资源类型说明
pub struct ResourceClass<T: SharedResourceObject> {
    descriptor: Arc<ComponentDescriptor>,
    parameters: ConfigurationParameters,
    data: Option<DataResource>,
    constructor: Constructor<T>,
    binder: ConfigurationBinder,
    injector: ResourceInjector,
}

impl<T: SharedResourceObject + Default> ResourceClass<T> {
    /// 创建以 `Default` 构造实例的资源类型说明
    ///
    /// 描述符在此时构建，无效的声明立即报错。
    pub fn new(cache: &DescriptorCache) -> WiringResult<Self> {
        Self::with_constructor(cache, T::default)
    }
}

impl<T: SharedResourceObject> ResourceClass<T> {
    /// 创建使用自定义构造函数的资源类型说明
    pub fn with_constructor<F>(cache: &DescriptorCache, constructor: F) -> WiringResult<Self>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Ok(Self {
            descriptor: cache.get_or_build::<T>()?,
            parameters: ConfigurationParameters::new(),
            data: None,
            constructor: Box::new(constructor),
            binder: ConfigurationBinder::new(),
            injector: ResourceInjector::new(),
        })
    }

    /// 设置单个构建参数
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.set(name, value);
        self
    }

    /// 合并构建参数
    pub fn with_parameters(mut self, parameters: &ConfigurationParameters) -> Self {
        self.parameters = self.parameters.merge(parameters);
        self
    }

    /// 设置后备数据位置
    pub fn with_data_location(mut self, uri: impl Into<String>) -> Self {
        self.data = Some(DataResource::new(uri));
        self
    }

    /// 资源类型的描述符
    pub fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    /// 转换为可绑定的资源说明
    pub fn into_specifier(self) -> ResourceSpecifier {
        ResourceSpecifier::factory(self)
    }
}

impl<T: SharedResourceObject> ResourceFactory for ResourceClass<T> {
    fn create(&self, key: &str, lookup: &dyn ResourceLookup) -> WiringResult<SharedResource> {
        let mut instance = (self.constructor)();
        self.binder
            .bind(&mut instance, &self.descriptor, &self.parameters)?;

        let (context, _) = ResourceKeyResolver::split(key);
        self.injector
            .inject(&mut instance, &self.descriptor, lookup, &context)?;

        instance
            .load(self.data.as_ref())
            .map_err(|source| WiringError::ResourceCreationFailed {
                key: key.to_string(),
                source,
            })?;

        info!("资源加载完成: {} ({})", key, self.descriptor.type_info.short_name());
        Ok(Arc::new(instance))
    }

    fn resource_type(&self) -> &str {
        self.descriptor.component_name()
    }

    fn dependencies(&self) -> Vec<ResourceDependency> {
        self.descriptor.resources.clone()
    }
}

impl<T: SharedResourceObject> fmt::Debug for ResourceClass<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClass")
            .field("resource_type", &self.descriptor.component_name())
            .field("parameters", &self.parameters)
            .field("data", &self.data)
            .finish()
    }
}
