//! 资源查找与资源工厂抽象接口
//!
//! 资源工厂负责在首次需要时构建资源实例，构建过程中可以通过
//! [`ResourceLookup`] 获取它自己依赖的其他资源。

use std::fmt;
use std::sync::Arc;
use tracing::debug;
use wiring_common::{ResourceDependency, SharedResource, WiringResult};

/// 资源查找接口
///
/// 按限定键查找资源，键未绑定时返回 `Ok(None)`。
pub trait ResourceLookup: Send + Sync {
    /// 查找资源实例，必要时触发构建
    fn lookup(&self, key: &str) -> WiringResult<Option<SharedResource>>;

    /// 键是否已绑定
    fn contains_key(&self, key: &str) -> bool;
}

/// 资源工厂 trait
pub trait ResourceFactory: Send + Sync {
    /// 构建资源实例
    ///
    /// `key` 是资源被绑定的限定键，资源自身依赖的键相对于它所在的上下文解析。
    fn create(&self, key: &str, lookup: &dyn ResourceLookup) -> WiringResult<SharedResource>;

    /// 资源类型名
    fn resource_type(&self) -> &str;

    /// 资源自身声明的依赖
    fn dependencies(&self) -> Vec<ResourceDependency> {
        Vec::new()
    }
}

type CreateFn = dyn Fn(&str, &dyn ResourceLookup) -> WiringResult<SharedResource> + Send + Sync;

/// Lambda 工厂包装器
pub struct LambdaFactory {
    resource_type: String,
    factory_fn: Box<CreateFn>,
    dependencies: Vec<ResourceDependency>,
}

impl LambdaFactory {
    /// 创建新的 Lambda 工厂
    pub fn new<F>(resource_type: impl Into<String>, factory_fn: F) -> Self
    where
        F: Fn(&str, &dyn ResourceLookup) -> WiringResult<SharedResource> + Send + Sync + 'static,
    {
        Self {
            resource_type: resource_type.into(),
            factory_fn: Box::new(factory_fn),
            dependencies: Vec::new(),
        }
    }

    /// 声明构建时会查找的资源键，供绑定图在构建前检测循环
    pub fn depends_on(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.dependencies.push(ResourceDependency {
            attribute: key.clone(),
            key,
            mandatory: true,
            resource_type: String::new(),
            description: None,
            shadowed: Vec::new(),
            declared_in: self.resource_type.clone(),
        });
        self
    }
}

impl ResourceFactory for LambdaFactory {
    fn create(&self, key: &str, lookup: &dyn ResourceLookup) -> WiringResult<SharedResource> {
        debug!("调用 Lambda 工厂: {} ({})", key, self.resource_type);
        (self.factory_fn)(key, lookup)
    }

    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn dependencies(&self) -> Vec<ResourceDependency> {
        self.dependencies.clone()
    }
}

impl fmt::Debug for LambdaFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LambdaFactory")
            .field("resource_type", &self.resource_type)
            .field("dependencies", &self.dependencies.len())
            .finish()
    }
}

/// 共享的资源工厂
pub type SharedFactory = Arc<dyn ResourceFactory>;
