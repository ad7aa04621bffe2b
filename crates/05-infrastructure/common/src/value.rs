//! 参数值
//!
//! [`ParameterValue`] 是强类型的参数值，整数统一以 `i64`、浮点统一以 `f64` 保存；
//! 写入字段时通过 [`FromParameterValue`] 收窄到字段的具体类型。

use crate::errors::ValueMismatch;
use crate::metadata::ParameterType;

/// 已解析的参数值
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    StringArray(Vec<String>),
    BooleanArray(Vec<bool>),
    IntegerArray(Vec<i64>),
    FloatArray(Vec<f64>),
}

impl ParameterValue {
    /// 值的语义类型
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Self::String(_) | Self::StringArray(_) => ParameterType::String,
            Self::Boolean(_) | Self::BooleanArray(_) => ParameterType::Boolean,
            Self::Integer(_) | Self::IntegerArray(_) => ParameterType::Integer,
            Self::Float(_) | Self::FloatArray(_) => ParameterType::Float,
        }
    }

    /// 是否为多值
    pub fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            Self::StringArray(_) | Self::BooleanArray(_) | Self::IntegerArray(_) | Self::FloatArray(_)
        )
    }

    /// 类型描述，如 `FLOAT` 或 `INTEGER[]`
    pub fn type_label(&self) -> String {
        if self.is_multi_valued() {
            format!("{}[]", self.parameter_type())
        } else {
            self.parameter_type().to_string()
        }
    }

    /// 将值重新编码为原始字符串序列
    pub fn encode(&self) -> Vec<String> {
        match self {
            Self::String(v) => vec![v.clone()],
            Self::Boolean(v) => vec![v.to_string()],
            Self::Integer(v) => vec![v.to_string()],
            Self::Float(v) => vec![v.to_string()],
            Self::StringArray(v) => v.clone(),
            Self::BooleanArray(v) => v.iter().map(ToString::to_string).collect(),
            Self::IntegerArray(v) => v.iter().map(ToString::to_string).collect(),
            Self::FloatArray(v) => v.iter().map(ToString::to_string).collect(),
        }
    }

    /// 拆分为标量元素；标量值返回自身
    pub fn elements(&self) -> Vec<ParameterValue> {
        match self {
            Self::StringArray(v) => v.iter().cloned().map(Self::String).collect(),
            Self::BooleanArray(v) => v.iter().copied().map(Self::Boolean).collect(),
            Self::IntegerArray(v) => v.iter().copied().map(Self::Integer).collect(),
            Self::FloatArray(v) => v.iter().copied().map(Self::Float).collect(),
            scalar => vec![scalar.clone()],
        }
    }

    /// 由同类型标量元素组装数组值
    pub fn array(
        parameter_type: ParameterType,
        elements: Vec<ParameterValue>,
    ) -> Result<Self, ValueMismatch> {
        let expected = format!("{}[]", parameter_type);
        let mismatch = |element: &ParameterValue| ValueMismatch::new(&expected, element.type_label());

        match parameter_type {
            ParameterType::String => elements
                .into_iter()
                .map(|e| match e {
                    Self::String(v) => Ok(v),
                    other => Err(mismatch(&other)),
                })
                .collect::<Result<_, _>>()
                .map(Self::StringArray),
            ParameterType::Boolean => elements
                .into_iter()
                .map(|e| match e {
                    Self::Boolean(v) => Ok(v),
                    other => Err(mismatch(&other)),
                })
                .collect::<Result<_, _>>()
                .map(Self::BooleanArray),
            ParameterType::Integer => elements
                .into_iter()
                .map(|e| match e {
                    Self::Integer(v) => Ok(v),
                    other => Err(mismatch(&other)),
                })
                .collect::<Result<_, _>>()
                .map(Self::IntegerArray),
            ParameterType::Float => elements
                .into_iter()
                .map(|e| match e {
                    Self::Float(v) => Ok(v),
                    other => Err(mismatch(&other)),
                })
                .collect::<Result<_, _>>()
                .map(Self::FloatArray),
        }
    }

    /// 检查每个元素都能写入给定 Rust 标量类型的字段
    ///
    /// 与字段写入使用同一套 [`FromParameterValue`] 收窄规则；
    /// 不需要收窄的类型总是通过。
    pub fn check_scalar_width(&self, scalar: &str) -> Result<(), ValueMismatch> {
        fn fits<T: FromParameterValue>(element: &ParameterValue) -> Result<(), ValueMismatch> {
            T::from_parameter_value(element).map(drop)
        }

        let check: fn(&ParameterValue) -> Result<(), ValueMismatch> = match scalar {
            "i8" => fits::<i8>,
            "i16" => fits::<i16>,
            "i32" => fits::<i32>,
            "isize" => fits::<isize>,
            "u8" => fits::<u8>,
            "u16" => fits::<u16>,
            "u32" => fits::<u32>,
            "u64" => fits::<u64>,
            "usize" => fits::<usize>,
            "f32" => fits::<f32>,
            _ => return Ok(()),
        };
        self.elements().iter().try_for_each(check)
    }
}

impl From<ParameterValue> for serde_json::Value {
    fn from(value: ParameterValue) -> Self {
        match value {
            ParameterValue::String(v) => v.into(),
            ParameterValue::Boolean(v) => v.into(),
            ParameterValue::Integer(v) => v.into(),
            ParameterValue::Float(v) => v.into(),
            ParameterValue::StringArray(v) => v.into(),
            ParameterValue::BooleanArray(v) => v.into(),
            ParameterValue::IntegerArray(v) => v.into(),
            ParameterValue::FloatArray(v) => v.into(),
        }
    }
}

/// 从参数值转换为字段类型
///
/// 派生宏生成的绑定代码通过此 trait 将参数值写入字段。
pub trait FromParameterValue: Sized {
    /// 转换参数值
    fn from_parameter_value(value: &ParameterValue) -> Result<Self, ValueMismatch>;
}

impl FromParameterValue for String {
    fn from_parameter_value(value: &ParameterValue) -> Result<Self, ValueMismatch> {
        match value {
            ParameterValue::String(v) => Ok(v.clone()),
            other => Err(ValueMismatch::new("STRING", other.type_label())),
        }
    }
}

impl FromParameterValue for bool {
    fn from_parameter_value(value: &ParameterValue) -> Result<Self, ValueMismatch> {
        match value {
            ParameterValue::Boolean(v) => Ok(*v),
            other => Err(ValueMismatch::new("BOOLEAN", other.type_label())),
        }
    }
}

impl FromParameterValue for f64 {
    fn from_parameter_value(value: &ParameterValue) -> Result<Self, ValueMismatch> {
        match value {
            ParameterValue::Float(v) => Ok(*v),
            other => Err(ValueMismatch::new("FLOAT", other.type_label())),
        }
    }
}

impl FromParameterValue for f32 {
    fn from_parameter_value(value: &ParameterValue) -> Result<Self, ValueMismatch> {
        match value {
            ParameterValue::Float(v) => {
                let narrowed = *v as f32;
                if v.is_finite() && !narrowed.is_finite() {
                    return Err(ValueMismatch::new("FLOAT(f32)", v.to_string()));
                }
                Ok(narrowed)
            }
            other => Err(ValueMismatch::new("FLOAT", other.type_label())),
        }
    }
}

macro_rules! integer_from_parameter_value {
    ($($ty:ty),*) => {
        $(
            impl FromParameterValue for $ty {
                fn from_parameter_value(value: &ParameterValue) -> Result<Self, ValueMismatch> {
                    match value {
                        ParameterValue::Integer(v) => <$ty>::try_from(*v).map_err(|_| {
                            ValueMismatch::new(
                                concat!("INTEGER(", stringify!($ty), ")"),
                                v.to_string(),
                            )
                        }),
                        other => Err(ValueMismatch::new("INTEGER", other.type_label())),
                    }
                }
            }
        )*
    };
}

integer_from_parameter_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: FromParameterValue> FromParameterValue for Vec<T> {
    fn from_parameter_value(value: &ParameterValue) -> Result<Self, ValueMismatch> {
        if !value.is_multi_valued() {
            return Err(ValueMismatch::new(
                format!("{}[]", value.parameter_type()),
                value.type_label(),
            ));
        }
        value.elements().iter().map(T::from_parameter_value).collect()
    }
}

impl<T: FromParameterValue> FromParameterValue for Option<T> {
    fn from_parameter_value(value: &ParameterValue) -> Result<Self, ValueMismatch> {
        T::from_parameter_value(value).map(Some)
    }
}
