//! 值转换器
//!
//! 将默认值的原始字符串编码和外部覆盖值解释为参数声明的语义类型。
//! 默认值与覆盖值走同一条元素转换路径，因此两者的解析规则完全一致。
//! 按描述符转换时还会检查值能否写入字段的具体 Rust 类型，收窄失败在写入任何字段之前报告。

use serde_json::Value;
use wiring_common::{ParameterDescriptor, ParameterType, ParameterValue, ValueMismatch};

/// 布尔真值字面量（大小写不敏感）
pub const TRUE_LITERAL: &str = "true";

/// 值转换器
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCoercer;

impl ValueCoercer {
    /// 创建新的值转换器
    pub fn new() -> Self {
        Self
    }

    /// 解析默认值的原始编码
    ///
    /// 单值参数必须恰好有一个编码；多值参数的空编码得到空数组。
    pub fn decode_default(
        &self,
        parameter_type: ParameterType,
        multi_valued: bool,
        raw: &[String],
    ) -> Result<ParameterValue, ValueMismatch> {
        if multi_valued {
            let items = raw.iter().cloned().map(Value::String).collect();
            return self.coerce(parameter_type, true, &Value::Array(items));
        }

        match raw {
            [single] => self.coerce(parameter_type, false, &Value::String(single.clone())),
            _ => Err(ValueMismatch::new(
                parameter_type.label(),
                format!("{} 个默认值编码", raw.len()),
            )),
        }
    }

    /// 转换外部提供的值
    ///
    /// 多值参数接受数组，单个标量按单元素数组处理；单值参数不接受数组。
    pub fn coerce(
        &self,
        parameter_type: ParameterType,
        multi_valued: bool,
        value: &Value,
    ) -> Result<ParameterValue, ValueMismatch> {
        match (multi_valued, value) {
            (true, Value::Array(items)) => {
                let elements = items
                    .iter()
                    .map(|item| self.coerce_element(parameter_type, item))
                    .collect::<Result<Vec<_>, _>>()?;
                ParameterValue::array(parameter_type, elements)
            }
            (true, scalar) => {
                let element = self.coerce_element(parameter_type, scalar)?;
                ParameterValue::array(parameter_type, vec![element])
            }
            (false, Value::Array(_)) => Err(ValueMismatch::new(
                parameter_type.label(),
                describe(value),
            )),
            (false, scalar) => self.coerce_element(parameter_type, scalar),
        }
    }

    /// 按参数描述符解析默认值编码，并检查字段宽度
    pub fn decode_parameter_default(
        &self,
        descriptor: &ParameterDescriptor,
        raw: &[String],
    ) -> Result<ParameterValue, ValueMismatch> {
        let value = self.decode_default(descriptor.parameter_type, descriptor.multi_valued, raw)?;
        descriptor.check_width(&value)?;
        Ok(value)
    }

    /// 按参数描述符转换覆盖值，并检查字段宽度
    pub fn coerce_parameter(
        &self,
        descriptor: &ParameterDescriptor,
        value: &Value,
    ) -> Result<ParameterValue, ValueMismatch> {
        let value = self.coerce(descriptor.parameter_type, descriptor.multi_valued, value)?;
        descriptor.check_width(&value)?;
        Ok(value)
    }

    /// 转换单个标量元素
    pub fn coerce_element(
        &self,
        parameter_type: ParameterType,
        value: &Value,
    ) -> Result<ParameterValue, ValueMismatch> {
        let mismatch = || ValueMismatch::new(parameter_type.label(), describe(value));

        match parameter_type {
            ParameterType::String => match value {
                Value::String(s) => Ok(ParameterValue::String(s.clone())),
                _ => Err(mismatch()),
            },
            ParameterType::Boolean => match value {
                Value::Bool(b) => Ok(ParameterValue::Boolean(*b)),
                // 非 "true" 的字符串一律解释为 false
                Value::String(s) => Ok(ParameterValue::Boolean(
                    s.eq_ignore_ascii_case(TRUE_LITERAL),
                )),
                _ => Err(mismatch()),
            },
            ParameterType::Integer => match value {
                Value::Number(n) => n.as_i64().map(ParameterValue::Integer).ok_or_else(mismatch),
                Value::String(s) => s
                    .parse::<i64>()
                    .map(ParameterValue::Integer)
                    .map_err(|_| mismatch()),
                _ => Err(mismatch()),
            },
            ParameterType::Float => match value {
                Value::Number(n) => n.as_f64().map(ParameterValue::Float).ok_or_else(mismatch),
                Value::String(s) => s
                    .parse::<f64>()
                    .map(ParameterValue::Float)
                    .map_err(|_| mismatch()),
                _ => Err(mismatch()),
            },
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Object(_) => "对象".to_string(),
        Value::Array(_) => format!("数组 {}", value),
        other => other.to_string(),
    }
}
