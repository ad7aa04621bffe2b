//! 配置参数覆盖
//!
//! 调用方提供的参数名到原始值的有序映射。同名参数以最后一次设置为准。

use serde::Serialize;
use serde_json::Value;
use wiring_common::{WiringError, WiringResult};

/// 配置参数覆盖集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationParameters {
    entries: Vec<(String, Value)>,
}

impl ConfigurationParameters {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加参数（构建器形式）
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// 设置参数
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.entries.retain(|(existing, _)| *existing != name);
        self.entries.push((name, value.into()));
    }

    /// 获取参数值
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// 是否包含参数
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// 所有参数名称（按设置顺序）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// 遍历参数
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 由名称-值对构建
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<Value>,
    {
        let mut parameters = Self::new();
        for (name, value) in pairs {
            parameters.set(name, value);
        }
        parameters
    }

    /// 由 JSON 对象构建；值为 `null` 的键视为未设置
    pub fn from_json(value: &Value) -> WiringResult<Self> {
        let Value::Object(map) = value else {
            return Err(WiringError::configuration_source(format!(
                "参数必须是对象, 实际为 {}",
                value
            )));
        };

        Ok(Self::from_pairs(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone())),
        ))
    }

    /// 由可序列化的类型化配置构建
    pub fn from_serializable<T: Serialize>(config: &T) -> WiringResult<Self> {
        let value = serde_json::to_value(config)
            .map_err(|e| WiringError::configuration_source(format!("参数序列化失败: {}", e)))?;
        Self::from_json(&value)
    }

    /// 合并另一个集合，`other` 中的同名参数优先
    pub fn merge(mut self, other: &ConfigurationParameters) -> Self {
        for (name, value) in other.iter() {
            self.set(name, value.clone());
        }
        self
    }
}
