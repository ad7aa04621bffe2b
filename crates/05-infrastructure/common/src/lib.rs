//! # Wiring Common
//!
//! 声明式组件装配引擎的公共模型：组件 trait、标记属性扫描、参数与资源描述符、
//! 参数值及错误类型。
//!
//! ## 核心组件
//!
//! - [`Component`] - 组件基础 trait，声明属性表并提供写入入口
//! - [`AnnotationScanner`] - 遍历继承链收集标记属性
//! - [`ComponentDescriptor`] - 构建一次、不可变的组件描述符
//! - [`ParameterValue`] - 强类型参数值
//! - [`WiringError`] - 装配错误
//!
//! ## 设计原则
//!
//! - 声明一次，自动绑定：属性表由 `#[derive(Component)]` 在编译期生成
//! - 描述符构建后不可变，可跨线程共享
//! - 错误总是指明出错的组件、属性或资源键

pub mod component;
pub mod conventions;
pub mod errors;
pub mod metadata;
pub mod scanner;
pub mod value;

pub use component::*;
pub use conventions::*;
pub use errors::*;
pub use metadata::*;
pub use scanner::*;
pub use value::*;
