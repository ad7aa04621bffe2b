//! 资源键解析
//!
//! 嵌套在聚合中的组件以其所经过的聚合键路径作为前缀限定资源键。
//! 外部对嵌套组件本地键的绑定与组件内部注入时的查找都经由
//! [`ResourceKeyResolver::qualify`] 计算，因此两者得到完全相同的限定键。

use std::fmt;
use wiring_common::KEY_SEPARATOR;

/// 装配上下文：从顶层到当前聚合所经过的聚合键路径
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AssemblyContext {
    path: Vec<String>,
}

impl AssemblyContext {
    /// 顶层上下文
    pub fn root() -> Self {
        Self::default()
    }

    /// 由点分前缀构建上下文，空前缀为顶层
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            path: prefix
                .split(KEY_SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// 进入子聚合
    pub fn child(&self, key: &str) -> Self {
        let mut path = self.path.clone();
        path.push(key.to_string());
        Self { path }
    }

    /// 进入多层嵌套的子聚合
    pub fn nested(&self, child_path: &[&str]) -> Self {
        child_path.iter().fold(self.clone(), |ctx, key| ctx.child(key))
    }

    /// 点分前缀，顶层为空字符串
    pub fn prefix(&self) -> String {
        self.path.join(&KEY_SEPARATOR.to_string())
    }

    /// 路径段
    pub fn segments(&self) -> &[String] {
        &self.path
    }

    /// 是否为顶层
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// 外层上下文，顶层没有外层
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            path: self.path[..self.path.len() - 1].to_vec(),
        })
    }
}

impl fmt::Display for AssemblyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.prefix())
        }
    }
}

/// 资源键解析器
#[derive(Debug, Default)]
pub struct ResourceKeyResolver;

impl ResourceKeyResolver {
    /// 计算本地键在上下文中的限定键
    pub fn qualify(context: &AssemblyContext, local_key: &str) -> String {
        if context.is_root() {
            local_key.to_string()
        } else {
            format!("{}{}{}", context.prefix(), KEY_SEPARATOR, local_key)
        }
    }

    /// 计算从外部针对嵌套子组件本地键的绑定所使用的限定键
    ///
    /// `child_path` 是从 `context` 到目标组件所在聚合的子键路径。
    pub fn qualify_external(context: &AssemblyContext, child_path: &[&str], local_key: &str) -> String {
        Self::qualify(&context.nested(child_path), local_key)
    }

    /// 注入时依次尝试的候选键：从最内层限定键到裸本地键
    pub fn candidates(context: &AssemblyContext, local_key: &str) -> Vec<String> {
        let mut candidates = Vec::with_capacity(context.segments().len() + 1);
        let mut current = Some(context.clone());
        while let Some(ctx) = current {
            candidates.push(Self::qualify(&ctx, local_key));
            current = ctx.parent();
        }
        candidates
    }

    /// 拆分限定键为上下文与本地键
    pub fn split(qualified_key: &str) -> (AssemblyContext, &str) {
        match qualified_key.rsplit_once(KEY_SEPARATOR) {
            Some((prefix, local)) => (AssemblyContext::from_prefix(prefix), local),
            None => (AssemblyContext::root(), qualified_key),
        }
    }
}
