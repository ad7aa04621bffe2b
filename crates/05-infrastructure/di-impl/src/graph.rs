//! 资源绑定图
//!
//! 限定键到资源说明的映射。工厂说明在首次请求时构建，可共享的说明每个槽位
//! 最多构建一次；绑定到同一说明（直接或经由别名）的所有键共享同一槽位，
//! 因此得到同一实例。图在一次顶层装配中构建，随装配结果一起销毁。
//!
//! 首次顶层查找前图会自动校验一次，声明的依赖成环时在任何构建开始前失败；
//! 修改绑定会清除校验结果。工厂在构建中查找的键必须通过
//! [`ResourceFactory::dependencies`](di_abstractions::ResourceFactory::dependencies) 声明，
//! 未声明的查找只由当前线程的解析链检测循环。

use di_abstractions::{
    ResolutionChain, ResourceDescriptor, ResourceKeyResolver, ResourceLookup, ResourceSpecifier,
    ResourceTarget, SharedFactory,
};
use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};
use wiring_common::{SharedResource, WiringError, WiringResult, KEY_SEPARATOR};

const GRAPH_COMPONENT: &str = "ResourceBindingGraph";

#[derive(Debug, Clone)]
enum Binding {
    Slot(usize),
    Alias(String),
}

enum SlotSource {
    Instance(SharedResource),
    Factory(SharedFactory),
}

struct ResourceSlot {
    /// 首次绑定的键，工厂以它所在的上下文解析自身依赖
    primary_key: String,
    specifier: ResourceSpecifier,
    source: SlotSource,
    cell: OnceCell<SharedResource>,
    constructions: AtomicUsize,
}

/// 资源绑定图
#[derive(Default)]
pub struct ResourceBindingGraph {
    bindings: HashMap<String, Binding>,
    slots: Vec<ResourceSlot>,
    validated: OnceCell<()>,
}

impl ResourceBindingGraph {
    /// 创建空的资源绑定图
    pub fn new() -> Self {
        Self::default()
    }

    /// 绑定限定键
    ///
    /// 键已绑定时返回 `DuplicateBinding`；与已有绑定身份相同的说明复用同一槽位。
    pub fn bind(&mut self, key: impl Into<String>, specifier: ResourceSpecifier) -> WiringResult<()> {
        let key = key.into();
        validate_key(&key)?;
        if self.bindings.contains_key(&key) {
            return Err(WiringError::duplicate_binding(key));
        }

        let binding = self.binding_for(&key, specifier);
        debug!("绑定资源键: {} -> {:?}", key, binding);
        self.bindings.insert(key, binding);
        self.validated = OnceCell::new();
        Ok(())
    }

    /// 绑定资源描述符
    pub fn bind_descriptor(&mut self, descriptor: ResourceDescriptor) -> WiringResult<()> {
        self.bind(descriptor.key, descriptor.specifier)
    }

    /// 将键绑定为另一个键的别名
    pub fn alias(&mut self, key: impl Into<String>, target_key: impl Into<String>) -> WiringResult<()> {
        self.bind(key, ResourceSpecifier::alias(target_key))
    }

    /// 显式替换键的绑定
    ///
    /// 已构建的旧实例不受影响，之后的请求解析到新说明。
    pub fn rebind(&mut self, key: impl Into<String>, specifier: ResourceSpecifier) -> WiringResult<()> {
        let key = key.into();
        validate_key(&key)?;
        let binding = self.binding_for(&key, specifier);
        if self.bindings.insert(key.clone(), binding).is_some() {
            info!("重新绑定资源键: {}", key);
        }
        self.validated = OnceCell::new();
        Ok(())
    }

    /// 键是否已绑定
    pub fn contains_key(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    /// 所有已绑定的键（已排序）
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// 绑定数量
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// 是否没有任何绑定
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// 键对应槽位已构建的次数
    pub fn construction_count(&self, key: &str) -> usize {
        match self.resolve_slot(key) {
            Ok(Some(index)) => self.slots[index].constructions.load(Ordering::SeqCst),
            _ => 0,
        }
    }

    /// 键对应的共享实例是否已构建
    pub fn is_constructed(&self, key: &str) -> bool {
        match self.resolve_slot(key) {
            Ok(Some(index)) => {
                let slot = &self.slots[index];
                matches!(slot.source, SlotSource::Instance(_)) || slot.cell.get().is_some()
            }
            _ => false,
        }
    }

    /// 校验图：别名必须指向已绑定的键且不成环，工厂资源之间的依赖不成环
    pub fn validate(&self) -> WiringResult<()> {
        for key in self.bindings.keys() {
            self.resolve_slot(key)?;
        }

        let edges = self.dependency_edges()?;
        let mut visited = HashSet::new();
        let mut visiting = Vec::new();
        for index in 0..self.slots.len() {
            if !visited.contains(&index) {
                self.dfs_check(index, &edges, &mut visited, &mut visiting)?;
            }
        }

        debug!("资源绑定图校验通过: {} 个键, {} 个槽位", self.bindings.len(), self.slots.len());
        Ok(())
    }

    /// 图自上次修改以来是否已通过校验
    pub fn is_validated(&self) -> bool {
        self.validated.get().is_some()
    }

    fn ensure_validated(&self) -> WiringResult<()> {
        self.validated.get_or_try_init(|| self.validate()).map(drop)
    }

    fn binding_for(&mut self, key: &str, specifier: ResourceSpecifier) -> Binding {
        let source = match specifier.target() {
            ResourceTarget::Alias(target) => return Binding::Alias(target.clone()),
            ResourceTarget::Instance(resource) => SlotSource::Instance(resource.clone()),
            ResourceTarget::Factory(factory) => SlotSource::Factory(factory.clone()),
        };

        if let Some(index) = self.slots.iter().position(|s| s.specifier.same_as(&specifier)) {
            return Binding::Slot(index);
        }

        self.slots.push(ResourceSlot {
            primary_key: key.to_string(),
            specifier,
            source,
            cell: OnceCell::new(),
            constructions: AtomicUsize::new(0),
        });
        Binding::Slot(self.slots.len() - 1)
    }

    /// 沿别名链解析到槽位，键未绑定时返回 `None`
    fn resolve_slot(&self, key: &str) -> WiringResult<Option<usize>> {
        let mut current = key;
        let mut seen: Vec<&str> = Vec::new();

        loop {
            match self.bindings.get(current) {
                None if seen.is_empty() => return Ok(None),
                None => {
                    return Err(WiringError::unbound_resource(
                        format!("{} (别名 {})", GRAPH_COMPONENT, seen.join(" -> ")),
                        current,
                    ));
                }
                Some(Binding::Slot(index)) => return Ok(Some(*index)),
                Some(Binding::Alias(target)) => {
                    if seen.contains(&current) {
                        seen.push(current);
                        return Err(WiringError::CircularResourceDependency {
                            chain: seen.join(" -> "),
                        });
                    }
                    seen.push(current);
                    current = target.as_str();
                }
            }
        }
    }

    fn dependency_edges(&self) -> WiringResult<Vec<Vec<usize>>> {
        let mut edges = vec![Vec::new(); self.slots.len()];
        for (index, slot) in self.slots.iter().enumerate() {
            let (context, _) = ResourceKeyResolver::split(&slot.primary_key);
            for dependency in slot.specifier.dependencies() {
                for candidate in ResourceKeyResolver::candidates(&context, &dependency.key) {
                    if let Some(target) = self.resolve_slot(&candidate)? {
                        edges[index].push(target);
                        break;
                    }
                }
            }
        }
        Ok(edges)
    }

    fn dfs_check(
        &self,
        current: usize,
        edges: &[Vec<usize>],
        visited: &mut HashSet<usize>,
        visiting: &mut Vec<usize>,
    ) -> WiringResult<()> {
        if let Some(start) = visiting.iter().position(|i| *i == current) {
            let mut chain: Vec<&str> = visiting[start..]
                .iter()
                .map(|i| self.slots[*i].primary_key.as_str())
                .collect();
            chain.push(&self.slots[current].primary_key);
            return Err(WiringError::CircularResourceDependency {
                chain: chain.join(" -> "),
            });
        }
        if visited.contains(&current) {
            return Ok(());
        }

        visiting.push(current);
        for dependency in &edges[current] {
            self.dfs_check(*dependency, edges, visited, visiting)?;
        }
        visiting.pop();
        visited.insert(current);

        Ok(())
    }

    fn lookup_with_chain(
        &self,
        key: &str,
        chain: &ResolutionChain,
    ) -> WiringResult<Option<SharedResource>> {
        let Some(index) = self.resolve_slot(key)? else {
            return Ok(None);
        };
        let slot = &self.slots[index];

        let factory = match &slot.source {
            SlotSource::Instance(resource) => return Ok(Some(resource.clone())),
            SlotSource::Factory(factory) => factory,
        };

        let chain = chain.extended(&slot.primary_key)?;
        let lookup = GraphLookup { graph: self, chain: &chain };

        if slot.specifier.is_sharable() {
            let resource = slot
                .cell
                .get_or_try_init(|| Self::construct(slot, factory, &lookup))?;
            Ok(Some(resource.clone()))
        } else {
            Self::construct(slot, factory, &lookup).map(Some)
        }
    }

    fn construct(
        slot: &ResourceSlot,
        factory: &SharedFactory,
        lookup: &dyn ResourceLookup,
    ) -> WiringResult<SharedResource> {
        debug!("构建资源: {} ({})", slot.primary_key, factory.resource_type());
        let resource = factory.create(&slot.primary_key, lookup)?;
        let count = slot.constructions.fetch_add(1, Ordering::SeqCst) + 1;
        info!("资源已构建: {} (第 {} 次)", slot.primary_key, count);
        Ok(resource)
    }
}

impl ResourceLookup for ResourceBindingGraph {
    /// 顶层查找；图未校验时先校验
    fn lookup(&self, key: &str) -> WiringResult<Option<SharedResource>> {
        self.ensure_validated()?;
        self.lookup_with_chain(key, &ResolutionChain::new())
    }

    fn contains_key(&self, key: &str) -> bool {
        ResourceBindingGraph::contains_key(self, key)
    }
}

impl fmt::Debug for ResourceBindingGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceBindingGraph")
            .field("keys", &self.keys())
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// 构建过程中嵌套查找使用的视图，携带当前解析链
struct GraphLookup<'a> {
    graph: &'a ResourceBindingGraph,
    chain: &'a ResolutionChain,
}

impl ResourceLookup for GraphLookup<'_> {
    fn lookup(&self, key: &str) -> WiringResult<Option<SharedResource>> {
        self.graph.lookup_with_chain(key, self.chain)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.graph.contains_key(key)
    }
}

fn validate_key(key: &str) -> WiringResult<()> {
    if key.is_empty() || key.split(KEY_SEPARATOR).any(str::is_empty) {
        return Err(WiringError::configuration_shape(
            GRAPH_COMPONENT,
            key,
            "资源键不能为空且不能包含空的前缀段",
        ));
    }
    Ok(())
}
