//! 约定规范定义
//!
//! 参数名、资源键和设置器名称的推导约定。

/// 资源键中聚合嵌套前缀的分隔符
pub const KEY_SEPARATOR: char = '.';

/// 属性路径中嵌入组件前缀的分隔符
pub const ATTRIBUTE_SEPARATOR: char = '.';

/// 命名约定规范
#[derive(Debug)]
pub struct NamingConventions;

impl NamingConventions {
    /// 属性自身的字段名（属性路径的最后一段）
    pub fn field_name(attribute: &str) -> &str {
        attribute
            .rsplit(ATTRIBUTE_SEPARATOR)
            .next()
            .unwrap_or(attribute)
    }

    /// 由属性推导参数名称
    pub fn parameter_name(attribute: &str) -> String {
        Self::field_name(attribute).to_string()
    }

    /// 由属性推导资源键
    pub fn resource_key(attribute: &str) -> String {
        Self::field_name(attribute).to_string()
    }

    /// 由属性推导设置器方法名
    pub fn setter_name(attribute: &str) -> String {
        format!("set_{}", Self::field_name(attribute))
    }

    /// 检查本地资源键或聚合子组件键是否有效
    pub fn is_valid_key_segment(key: &str) -> bool {
        !key.is_empty() && !key.contains(KEY_SEPARATOR) && !key.chars().any(char::is_whitespace)
    }
}
