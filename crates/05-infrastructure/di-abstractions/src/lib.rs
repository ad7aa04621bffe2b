//! # Dependency Injection Abstractions
//!
//! 资源注入抽象层，定义资源键解析、资源查找与资源说明的核心接口。
//!
//! ## 核心接口
//!
//! - [`ResourceKeyResolver`] - 资源键限定与作用域回退
//! - [`ResourceLookup`] - 资源查找接口
//! - [`ResourceFactory`] - 资源工厂接口
//! - [`ResourceSpecifier`] - 资源绑定说明

pub mod factory;
pub mod key;
pub mod resolver;
pub mod specifier;

pub use factory::*;
pub use key::*;
pub use resolver::*;
pub use specifier::*;
