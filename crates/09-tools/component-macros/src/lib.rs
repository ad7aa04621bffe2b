//! # Component Macros
//!
//! 这个 crate 提供 `#[derive(Component)]`，在编译期为组件生成属性表和写入代码。
//!
//! ## 字段标记
//!
//! - `#[parameter(...)]` - 配置参数：`name`、`description`、`optional`/`mandatory`、
//!   `default = "x" | ["a", "b"] | 字面量`、`setter` 或 `setter = "方法名"`
//! - `#[resource(...)]` - 外部资源依赖，字段类型为 `Option<Arc<T>>`：`key`、`description`、
//!   `optional`/`mandatory`、`setter` 或 `setter = "方法名"`
//! - `#[inherit]` - 嵌入的基础组件，其属性以字段名为路径前缀
//!
//! 结构体上的 `#[component(init = "方法名")]` 指定初始化钩子。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::Component;
//! use std::sync::Arc;
//!
//! #[derive(Default, Component)]
//! #[component(init = "setup")]
//! pub struct Tagger {
//!     #[parameter(description = "置信度阈值")]
//!     threshold: f64,
//!     #[parameter(optional, default = ["NN", "VB"])]
//!     tags: Vec<String>,
//!     #[resource(key = "Model")]
//!     model: Option<Arc<Model>>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod component;
mod utils;

/// 组件派生宏
///
/// 为结构体实现 `wiring_common::Component`。不支持的参数字段类型和
/// 形态错误的资源字段在编译期报错。
#[proc_macro_derive(Component, attributes(component, parameter, resource, inherit))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::derive_component_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
