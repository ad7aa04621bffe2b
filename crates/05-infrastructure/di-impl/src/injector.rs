//! 资源注入器
//!
//! 按组件描述符声明的资源依赖，在装配上下文中查找资源并注入组件实例。
//! 查找先使用完整限定键，再依次回退到外层前缀，最后是裸本地键。
//! 全部依赖查找完成后才开始注入，缺少必需资源时不会注入任何资源。

use di_abstractions::{AssemblyContext, ResourceKeyResolver, ResourceLookup};
use tracing::debug;
use wiring_common::{Component, ComponentDescriptor, SharedResource, WiringError, WiringResult};

/// 已注入的资源记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedResource {
    /// 依赖声明的本地键
    pub local_key: String,
    /// 实际命中的限定键
    pub resolved_key: String,
    /// 注入的属性路径
    pub attribute: String,
}

/// 资源注入器
#[derive(Debug, Default, Clone, Copy)]
pub struct ResourceInjector;

impl ResourceInjector {
    /// 创建新的资源注入器
    pub fn new() -> Self {
        Self
    }

    /// 查找单个依赖，返回命中的限定键与资源
    pub fn resolve(
        &self,
        lookup: &dyn ResourceLookup,
        context: &AssemblyContext,
        local_key: &str,
    ) -> WiringResult<Option<(String, SharedResource)>> {
        for candidate in ResourceKeyResolver::candidates(context, local_key) {
            if let Some(resource) = lookup.lookup(&candidate)? {
                return Ok(Some((candidate, resource)));
            }
        }
        Ok(None)
    }

    /// 为组件实例注入全部声明的资源
    pub fn inject<C: Component + ?Sized>(
        &self,
        instance: &mut C,
        descriptor: &ComponentDescriptor,
        lookup: &dyn ResourceLookup,
        context: &AssemblyContext,
    ) -> WiringResult<Vec<InjectedResource>> {
        let component = descriptor.component_name();
        let mut resolved = Vec::with_capacity(descriptor.resources.len());

        for dependency in &descriptor.resources {
            match self.resolve(lookup, context, &dependency.key)? {
                Some((key, resource)) => resolved.push((dependency, key, resource)),
                None if dependency.mandatory => {
                    return Err(WiringError::unbound_resource(
                        component,
                        ResourceKeyResolver::qualify(context, &dependency.key),
                    ));
                }
                None => debug!(
                    "可选资源未绑定, 跳过: {} -> {}",
                    ResourceKeyResolver::qualify(context, &dependency.key),
                    component
                ),
            }
        }

        let mut injected = Vec::with_capacity(resolved.len());
        for (dependency, key, resource) in resolved {
            // 被覆盖的基础属性注入同一个实例
            for attribute in dependency.attributes() {
                instance.inject_resource(attribute, resource.clone())?;
                debug!("注入资源: {} -> {}.{}", key, component, attribute);
                injected.push(InjectedResource {
                    local_key: dependency.key.clone(),
                    resolved_key: key.clone(),
                    attribute: attribute.to_string(),
                });
            }
        }

        Ok(injected)
    }
}
