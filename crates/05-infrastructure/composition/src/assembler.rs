//! 组件装配器
//!
//! 装配顺序固定为：绑定配置参数、注入资源、调用初始化钩子。
//! 任一步骤失败时实例被丢弃，调用方不会得到部分绑定的组件。

use crate::aggregate::AssembledAggregate;
use crate::description::{AggregateDescription, ChildDescription, PrimitiveDescription};
use crate::session::AssemblySession;
use config_impl::{ConfigurationBinder, ConfigurationParameters, DescriptorCache};
use di_abstractions::{AssemblyContext, ResourceKeyResolver, ResourceLookup};
use di_impl::{ResourceBindingGraph, ResourceInjector};
use std::sync::Arc;
use tracing::{debug, info};
use wiring_common::{AnyComponent, Component, ComponentDescriptor, WiringError, WiringResult};

/// 组件装配器
#[derive(Debug, Clone, Default)]
pub struct ComponentAssembler {
    cache: Arc<DescriptorCache>,
    binder: ConfigurationBinder,
    injector: ResourceInjector,
}

impl ComponentAssembler {
    /// 创建使用独立描述符缓存的装配器
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建共享指定描述符缓存的装配器
    pub fn with_cache(cache: Arc<DescriptorCache>) -> Self {
        Self {
            cache,
            ..Self::default()
        }
    }

    /// 描述符缓存
    pub fn cache(&self) -> &Arc<DescriptorCache> {
        &self.cache
    }

    /// 装配以 `Default` 构造的组件
    pub fn assemble<C: Component + Default>(
        &self,
        parameters: &ConfigurationParameters,
        lookup: &dyn ResourceLookup,
        context: &AssemblyContext,
    ) -> WiringResult<C> {
        self.assemble_with(C::default(), parameters, lookup, context)
    }

    /// 装配已构造的组件实例
    pub fn assemble_with<C: Component>(
        &self,
        mut instance: C,
        parameters: &ConfigurationParameters,
        lookup: &dyn ResourceLookup,
        context: &AssemblyContext,
    ) -> WiringResult<C> {
        let descriptor = self.cache.get_or_build::<C>()?;
        self.configure(&mut instance, &descriptor, parameters, lookup, context)?;
        Ok(instance)
    }

    /// 装配基本组件描述
    pub fn assemble_primitive(
        &self,
        description: &PrimitiveDescription,
        lookup: &dyn ResourceLookup,
        context: &AssemblyContext,
    ) -> WiringResult<Box<dyn AnyComponent>> {
        let mut instance = description.instantiate();
        self.configure(
            instance.as_mut(),
            description.descriptor(),
            description.parameters(),
            lookup,
            context,
        )?;
        Ok(instance)
    }

    /// 装配聚合
    ///
    /// 为本次装配构建并校验资源绑定图，再按声明顺序装配全部基本组件。
    pub fn assemble_aggregate(
        &self,
        description: &AggregateDescription,
    ) -> WiringResult<AssembledAggregate> {
        let session = AssemblySession::new();
        let span = session.span();
        let _guard = span.enter();

        info!("开始装配聚合: {} 个基本组件", description.primitive_count());

        let root = AssemblyContext::root();
        let mut graph = ResourceBindingGraph::new();
        description.register_resources(&root, &mut graph)?;
        graph.validate()?;

        let mut components = Vec::with_capacity(description.primitive_count());
        self.assemble_children(description, &root, &graph, &mut components)?;

        info!(
            "聚合装配完成: {} 个组件, {} 个资源键, 耗时 {}ms",
            components.len(),
            graph.len(),
            session.elapsed_ms()
        );
        Ok(AssembledAggregate::new(session, graph, components))
    }

    fn assemble_children(
        &self,
        description: &AggregateDescription,
        context: &AssemblyContext,
        graph: &ResourceBindingGraph,
        components: &mut Vec<(String, Box<dyn AnyComponent>)>,
    ) -> WiringResult<()> {
        for (key, child) in description.children() {
            match child {
                ChildDescription::Primitive(primitive) => {
                    let path = ResourceKeyResolver::qualify(context, key);
                    debug!("装配子组件: {}", path);
                    let instance = self.assemble_primitive(primitive, graph, context)?;
                    components.push((path, instance));
                }
                ChildDescription::Aggregate(aggregate) => {
                    self.assemble_children(aggregate, &context.child(key), graph, components)?;
                }
            }
        }
        Ok(())
    }

    fn configure<C: Component + ?Sized>(
        &self,
        instance: &mut C,
        descriptor: &ComponentDescriptor,
        parameters: &ConfigurationParameters,
        lookup: &dyn ResourceLookup,
        context: &AssemblyContext,
    ) -> WiringResult<()> {
        let component = descriptor.component_name();

        self.binder.bind(instance, descriptor, parameters)?;
        self.injector.inject(instance, descriptor, lookup, context)?;
        instance
            .initialize()
            .map_err(|source| WiringError::InitializationFailed {
                component: component.to_string(),
                source,
            })?;

        debug!("组件装配完成: {} (上下文 {})", component, context);
        Ok(())
    }
}
