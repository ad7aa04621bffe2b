//! 资源解析上下文

use tracing::debug;
use wiring_common::{WiringError, WiringResult};

/// 解析链
///
/// 记录当前正在构建的资源键，用于检测资源之间的循环依赖。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionChain {
    keys: Vec<String>,
}

impl ResolutionChain {
    /// 创建空解析链
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加键到解析链
    pub fn push_key(&mut self, key: &str) -> WiringResult<()> {
        if self.contains(key) {
            let mut chain = self.keys.clone();
            chain.push(key.to_string());
            let chain = chain.join(" -> ");
            debug!("解析链检测到循环依赖: {}", chain);
            return Err(WiringError::CircularResourceDependency { chain });
        }
        self.keys.push(key.to_string());
        Ok(())
    }

    /// 从解析链中移除最后一个键
    pub fn pop_key(&mut self) {
        self.keys.pop();
    }

    /// 键是否在解析链中
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// 解析链深度
    pub fn depth(&self) -> usize {
        self.keys.len()
    }

    /// 派生包含额外键的新解析链
    pub fn extended(&self, key: &str) -> WiringResult<Self> {
        let mut chain = self.clone();
        chain.push_key(key)?;
        Ok(chain)
    }
}
