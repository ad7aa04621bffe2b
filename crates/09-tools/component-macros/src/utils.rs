//! 宏工具函数

use proc_macro2::Span;
use syn::{Expr, Field, Ident, Lit, Result, Type, UnOp};

/// 从类型中提取第一个泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(syn::GenericArgument::Type(inner_type)) = args.args.first() {
                    return Some(inner_type);
                }
            }
        }
    }
    None
}

/// 检查类型路径的最后一段是否为指定名称
pub fn is_wrapper_type(ty: &Type, wrapper: &str) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == wrapper)
            .unwrap_or(false),
        _ => false,
    }
}

/// 检查类型是否为 Option<T>
pub fn is_option_type(ty: &Type) -> bool {
    is_wrapper_type(ty, "Option")
}

/// 从 `Option<Arc<T>>` 中取出资源类型 `T`
pub fn extract_resource_type(ty: &Type) -> Option<&Type> {
    if !is_option_type(ty) {
        return None;
    }
    let handle = extract_generic_type(ty)?;
    if !is_wrapper_type(handle, "Arc") {
        return None;
    }
    extract_generic_type(handle)
}

/// 生成设置器方法名
pub fn generate_setter_name(field_name: &str) -> Ident {
    let setter_name = wiring_common::NamingConventions::setter_name(field_name);
    Ident::new(&setter_name, Span::call_site())
}

/// 检查字段是否有特定属性
pub fn field_has_attribute(field: &Field, attr_name: &str) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(attr_name))
}

/// 将默认值表达式编码为原始字符串序列
///
/// 支持字符串、布尔、整数、浮点字面量（可带负号）以及它们组成的数组。
pub fn encode_default(expr: &Expr) -> Result<Vec<String>> {
    match expr {
        Expr::Array(array) => array
            .elems
            .iter()
            .map(encode_literal)
            .collect::<Result<Vec<_>>>(),
        other => Ok(vec![encode_literal(other)?]),
    }
}

fn encode_literal(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Ok(lit_str.value()),
            Lit::Bool(lit_bool) => Ok(lit_bool.value.to_string()),
            Lit::Int(lit_int) => Ok(lit_int.base10_digits().to_string()),
            Lit::Float(lit_float) => Ok(lit_float.base10_digits().to_string()),
            other => Err(syn::Error::new_spanned(other, "不支持的默认值字面量")),
        },
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => {
            let digits = encode_literal(&unary.expr)?;
            if digits.starts_with('-') || digits.parse::<f64>().is_err() {
                return Err(syn::Error::new_spanned(expr, "负号只能用于数值字面量"));
            }
            Ok(format!("-{}", digits))
        }
        Expr::Group(group) => encode_literal(&group.expr),
        Expr::Paren(paren) => encode_literal(&paren.expr),
        other => Err(syn::Error::new_spanned(
            other,
            "默认值必须是字面量或字面量数组",
        )),
    }
}
