//! # Configuration Implementation
//!
//! 组件配置的具体实现：描述符构建、值转换与配置绑定。
//!
//! ## 主要组件
//!
//! - [`ValueCoercer`] - 默认值与覆盖值的类型转换
//! - [`ParameterDescriptorBuilder`] / [`ComponentDescriptorBuilder`] - 描述符构建
//! - [`DescriptorCache`] - 按组件类型缓存描述符
//! - [`ConfigurationParameters`] - 调用方提供的参数覆盖
//! - [`ConfigurationBinder`] - 参数值确定与写入
//! - [`ParameterSource`] - 从配置文件与环境变量读取参数

pub mod binder;
pub mod cache;
pub mod coercer;
pub mod descriptor;
pub mod parameters;
pub mod sources;

pub use binder::*;
pub use cache::*;
pub use coercer::*;
pub use descriptor::*;
pub use parameters::*;
pub use sources::*;
