//! 聚合装配结果
//!
//! 持有本次装配的资源绑定图和全部已装配的基本组件。
//! 丢弃装配结果即销毁资源图及其中构建的共享资源（组件仍持有的句柄除外）。

use crate::session::AssemblySession;
use di_impl::ResourceBindingGraph;
use std::fmt;
use wiring_common::{AnyComponent, Component};

/// 已装配的聚合
pub struct AssembledAggregate {
    session: AssemblySession,
    graph: ResourceBindingGraph,
    components: Vec<(String, Box<dyn AnyComponent>)>,
}

impl AssembledAggregate {
    pub(crate) fn new(
        session: AssemblySession,
        graph: ResourceBindingGraph,
        components: Vec<(String, Box<dyn AnyComponent>)>,
    ) -> Self {
        Self {
            session,
            graph,
            components,
        }
    }

    /// 按点分路径获取组件
    pub fn component<T: Component>(&self, path: &str) -> Option<&T> {
        self.components
            .iter()
            .find(|(p, _)| p == path)
            .and_then(|(_, component)| component.as_any().downcast_ref::<T>())
    }

    /// 按点分路径获取可变组件
    pub fn component_mut<T: Component>(&mut self, path: &str) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find(|(p, _)| p == path)
            .and_then(|(_, component)| component.as_any_mut().downcast_mut::<T>())
    }

    /// 所有组件路径（按装配顺序）
    pub fn paths(&self) -> Vec<&str> {
        self.components.iter().map(|(path, _)| path.as_str()).collect()
    }

    /// 按装配顺序遍历组件
    pub fn components(&self) -> impl Iterator<Item = (&str, &dyn AnyComponent)> {
        self.components
            .iter()
            .map(|(path, component)| (path.as_str(), component.as_ref()))
    }

    /// 组件数量
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// 是否没有组件
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// 本次装配的资源绑定图
    pub fn graph(&self) -> &ResourceBindingGraph {
        &self.graph
    }

    /// 装配会话
    pub fn session(&self) -> &AssemblySession {
        &self.session
    }
}

impl fmt::Debug for AssembledAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssembledAggregate")
            .field("session", &self.session.id)
            .field("components", &self.paths())
            .field("graph", &self.graph)
            .finish()
    }
}
