//! # 资源注入具体实现
//!
//! 提供资源绑定图、基于组件类型的资源说明和资源注入器实现。
//!
//! - [`ResourceBindingGraph`] - 延迟构建、按说明共享实例的资源绑定图
//! - [`ResourceClass`] - 由组件类型加构建参数描述的资源
//! - [`ResourceInjector`] - 按声明的依赖查找并注入资源

pub mod graph;
pub mod injector;
pub mod resource_class;

pub use graph::*;
pub use injector::*;
pub use resource_class::*;
