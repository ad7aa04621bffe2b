//! 元数据定义
//!
//! 参数描述符、资源依赖和组件描述符。描述符每个组件类型构建一次，
//! 构建后不可变，以 `Arc` 形式在装配过程间共享。

use crate::errors::ValueMismatch;
use crate::value::ParameterValue;
use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称（不含模块路径）
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: full_name
                .split("::")
                .last()
                .unwrap_or("Unknown")
                .to_string(),
            id: TypeId::of::<T>(),
            module_path: full_name.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        self.name.split("::").last().unwrap_or(&self.name)
    }
}

/// 参数语义类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    String,
    Boolean,
    Integer,
    Float,
}

impl ParameterType {
    /// 将 Rust 标量类型名映射为语义类型
    pub fn for_rust_scalar(name: &str) -> Option<Self> {
        match name {
            "String" => Some(Self::String),
            "bool" => Some(Self::Boolean),
            "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
                Some(Self::Integer)
            }
            "f32" | "f64" => Some(Self::Float),
            _ => None,
        }
    }

    /// 语义类型的标签
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 属性字段的形态
///
/// 由字段的 Rust 类型推导：标量、`Vec<标量>`（多值），可选地包裹在 `Option` 中。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldShape {
    /// 语义类型
    pub parameter_type: ParameterType,
    /// 是否为多值（数组）
    pub multi_valued: bool,
    /// 字段是否包裹在 `Option` 中
    pub optional: bool,
    /// 标量元素的 Rust 类型名，如 `u8`
    pub scalar_type: String,
}

impl FieldShape {
    /// 根据类型文本推导字段形态
    ///
    /// 类型文本中的空白会被忽略，路径限定（如 `std::string::String`）按最后一段识别。
    /// 不支持的类型返回错误描述。
    pub fn classify(rust_type: &str) -> Result<Self, String> {
        let normalized: String = rust_type.chars().filter(|c| !c.is_whitespace()).collect();

        let (optional, inner) = match unwrap_generic(&normalized, "Option") {
            Some(inner) => (true, inner),
            None => (false, normalized.as_str()),
        };
        let (multi_valued, element) = match unwrap_generic(inner, "Vec") {
            Some(element) => (true, element),
            None => (false, inner),
        };

        let scalar_type = last_segment(element);
        let parameter_type = ParameterType::for_rust_scalar(scalar_type)
            .ok_or_else(|| format!("不支持的参数字段类型: {}", normalized))?;

        Ok(Self {
            parameter_type,
            multi_valued,
            optional,
            scalar_type: scalar_type.to_string(),
        })
    }
}

fn unwrap_generic<'a>(ty: &'a str, wrapper: &str) -> Option<&'a str> {
    let open = ty.find('<')?;
    if !ty.ends_with('>') {
        return None;
    }
    if last_segment(&ty[..open]) != wrapper {
        return None;
    }
    Some(&ty[open + 1..ty.len() - 1])
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// 被派生层同名声明覆盖的基础属性
///
/// 覆盖后基础字段不再单独成为参数，但仍写入同一个参数值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowedAttribute {
    /// 属性路径
    pub attribute: String,
    /// 字段标量的 Rust 类型名
    pub scalar_type: String,
}

/// 参数描述符
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// 参数名称（组件内唯一）
    pub name: String,
    /// 参数描述
    pub description: Option<String>,
    /// 语义类型
    pub parameter_type: ParameterType,
    /// 是否多值
    pub multi_valued: bool,
    /// 是否必需
    pub mandatory: bool,
    /// 默认值的原始编码
    pub default_value: Option<Vec<String>>,
    /// 构建时已解析的默认值
    pub coerced_default: Option<ParameterValue>,
    /// 来源属性路径（继承的属性带前缀，如 `base.threshold`）
    pub attribute: String,
    /// 字段标量的 Rust 类型名
    pub scalar_type: String,
    /// 被覆盖的基础属性
    pub shadowed: Vec<ShadowedAttribute>,
    /// 声明该属性的类型
    pub declared_in: String,
}

impl ParameterDescriptor {
    /// 所有写入目标的属性路径，自身属性在前
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.attribute.as_str())
            .chain(self.shadowed.iter().map(|s| s.attribute.as_str()))
    }

    /// 检查值能否写入每个目标字段
    pub fn check_width(&self, value: &ParameterValue) -> Result<(), ValueMismatch> {
        value.check_scalar_width(&self.scalar_type)?;
        self.shadowed
            .iter()
            .try_for_each(|s| value.check_scalar_width(&s.scalar_type))
    }

    /// 类型描述，如 `FLOAT` 或 `INTEGER[]`
    pub fn type_label(&self) -> String {
        if self.multi_valued {
            format!("{}[]", self.parameter_type)
        } else {
            self.parameter_type.to_string()
        }
    }
}

/// 组件声明的外部资源依赖
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDependency {
    /// 本地资源键（不含聚合前缀）
    pub key: String,
    /// 注入目标属性路径
    pub attribute: String,
    /// 是否必需
    pub mandatory: bool,
    /// 资源的 Rust 类型名
    pub resource_type: String,
    /// 依赖描述
    pub description: Option<String>,
    /// 被覆盖的基础属性路径，注入同一个实例
    pub shadowed: Vec<String>,
    /// 声明该属性的类型
    pub declared_in: String,
}

impl ResourceDependency {
    /// 所有注入目标的属性路径，自身属性在前
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.attribute.as_str()).chain(self.shadowed.iter().map(String::as_str))
    }
}

/// 组件描述符
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    /// 组件类型信息
    pub type_info: TypeInfo,
    /// 参数描述符（按声明顺序，名称唯一）
    pub parameters: Vec<ParameterDescriptor>,
    /// 资源依赖（本地键唯一）
    pub resources: Vec<ResourceDependency>,
}

impl ComponentDescriptor {
    /// 组件完整类型名
    pub fn component_name(&self) -> &str {
        &self.type_info.module_path
    }

    /// 按名称查找参数描述符
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// 所有参数名称
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// 按本地键查找资源依赖
    pub fn resource(&self, key: &str) -> Option<&ResourceDependency> {
        self.resources.iter().find(|r| r.key == key)
    }

    /// 所有声明的资源键
    pub fn resource_keys(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.key.as_str()).collect()
    }
}
