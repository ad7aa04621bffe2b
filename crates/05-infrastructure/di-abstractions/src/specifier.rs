//! 资源说明
//!
//! 资源键绑定的目标：已有的共享实例、延迟构建的工厂，或指向另一个键的别名。
//! 克隆的说明共享同一身份，绑定到同一说明的多个键解析到同一实例。

use crate::factory::{LambdaFactory, ResourceFactory, ResourceLookup, SharedFactory};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use wiring_common::{ResourceDependency, SharedResource, WiringResult};

/// 资源绑定目标
#[derive(Clone)]
pub enum ResourceTarget {
    /// 已存在的共享实例
    Instance(SharedResource),
    /// 首次需要时由工厂构建
    Factory(SharedFactory),
    /// 指向另一个限定键
    Alias(String),
}

impl fmt::Debug for ResourceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance"),
            Self::Factory(factory) => write!(f, "Factory({})", factory.resource_type()),
            Self::Alias(target) => write!(f, "Alias({})", target),
        }
    }
}

/// 资源说明
#[derive(Clone, Debug)]
pub struct ResourceSpecifier {
    target: ResourceTarget,
    sharable: bool,
}

impl ResourceSpecifier {
    /// 由值创建实例说明
    pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
        Self::shared(Arc::new(value))
    }

    /// 由已共享的实例创建说明
    pub fn shared(resource: SharedResource) -> Self {
        Self {
            target: ResourceTarget::Instance(resource),
            sharable: true,
        }
    }

    /// 由工厂创建延迟构建的说明
    pub fn factory<F: ResourceFactory + 'static>(factory: F) -> Self {
        Self::from_factory(Arc::new(factory))
    }

    /// 由共享工厂创建说明
    pub fn from_factory(factory: SharedFactory) -> Self {
        Self {
            target: ResourceTarget::Factory(factory),
            sharable: true,
        }
    }

    /// 由闭包创建延迟构建的说明
    pub fn from_fn<F>(resource_type: impl Into<String>, factory_fn: F) -> Self
    where
        F: Fn(&str, &dyn ResourceLookup) -> WiringResult<SharedResource> + Send + Sync + 'static,
    {
        Self::factory(LambdaFactory::new(resource_type, factory_fn))
    }

    /// 创建指向另一个限定键的别名说明
    pub fn alias(target_key: impl Into<String>) -> Self {
        Self {
            target: ResourceTarget::Alias(target_key.into()),
            sharable: true,
        }
    }

    /// 设置为不可共享：每次注入都构建新实例
    ///
    /// 只对工厂说明有效，实例说明始终共享同一实例。
    pub fn non_sharable(mut self) -> Self {
        self.sharable = false;
        self
    }

    /// 是否可共享
    pub fn is_sharable(&self) -> bool {
        self.sharable
    }

    /// 绑定目标
    pub fn target(&self) -> &ResourceTarget {
        &self.target
    }

    /// 资源类型名
    pub fn resource_type(&self) -> String {
        match &self.target {
            ResourceTarget::Instance(_) => "<instance>".to_string(),
            ResourceTarget::Factory(factory) => factory.resource_type().to_string(),
            ResourceTarget::Alias(target) => format!("<alias {}>", target),
        }
    }

    /// 工厂资源声明的依赖
    pub fn dependencies(&self) -> Vec<ResourceDependency> {
        match &self.target {
            ResourceTarget::Factory(factory) => factory.dependencies(),
            _ => Vec::new(),
        }
    }

    /// 两个说明是否具有相同身份（由同一说明克隆而来）
    pub fn same_as(&self, other: &ResourceSpecifier) -> bool {
        if self.sharable != other.sharable {
            return false;
        }
        match (&self.target, &other.target) {
            (ResourceTarget::Instance(a), ResourceTarget::Instance(b)) => Arc::ptr_eq(a, b),
            (ResourceTarget::Factory(a), ResourceTarget::Factory(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (ResourceTarget::Alias(a), ResourceTarget::Alias(b)) => a == b,
            _ => false,
        }
    }
}

/// 资源描述符：限定键及其绑定说明
#[derive(Clone, Debug)]
pub struct ResourceDescriptor {
    /// 限定键
    pub key: String,
    /// 绑定说明
    pub specifier: ResourceSpecifier,
}

impl ResourceDescriptor {
    /// 创建新的资源描述符
    pub fn new(key: impl Into<String>, specifier: ResourceSpecifier) -> Self {
        Self {
            key: key.into(),
            specifier,
        }
    }
}
