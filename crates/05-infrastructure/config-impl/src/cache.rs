//! 描述符缓存
//!
//! 每个组件类型的描述符只构建一次，此后以只读 `Arc` 在并发装配之间共享。

use crate::descriptor::ComponentDescriptorBuilder;
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;
use wiring_common::{Component, ComponentDescriptor, WiringResult};

/// 组件描述符缓存
#[derive(Debug, Default)]
pub struct DescriptorCache {
    descriptors: DashMap<TypeId, Arc<ComponentDescriptor>>,
    builder: ComponentDescriptorBuilder,
}

impl DescriptorCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取组件描述符，首次访问时构建
    ///
    /// 并发首次访问可能各自构建一次，但只有最先发布的描述符会被所有调用方看到。
    /// 构建失败不会被缓存。
    pub fn get_or_build<C: Component>(&self) -> WiringResult<Arc<ComponentDescriptor>> {
        let type_id = TypeId::of::<C>();
        if let Some(descriptor) = self.descriptors.get(&type_id) {
            return Ok(Arc::clone(descriptor.value()));
        }

        let built = Arc::new(self.builder.build::<C>()?);
        let published = Arc::clone(self.descriptors.entry(type_id).or_insert(built).value());
        debug!("缓存组件描述符: {}", published.component_name());
        Ok(published)
    }

    /// 按类型ID查找已缓存的描述符
    pub fn get(&self, type_id: &TypeId) -> Option<Arc<ComponentDescriptor>> {
        self.descriptors.get(type_id).map(|d| Arc::clone(d.value()))
    }

    /// 是否已缓存指定组件类型
    pub fn contains<C: Component>(&self) -> bool {
        self.descriptors.contains_key(&TypeId::of::<C>())
    }

    /// 已缓存的描述符数量
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// 缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
