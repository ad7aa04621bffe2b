//! # 组件装配组合层
//!
//! 这个 crate 把描述符构建、配置绑定与资源注入组合成完整的装配流程。
//!
//! ## 主要功能
//!
//! - **组件装配器**: 按 绑定配置 → 注入资源 → 初始化 的固定顺序装配组件
//! - **聚合描述**: 以键组织子组件，在聚合内或针对嵌套子组件绑定共享资源
//! - **装配会话**: 每次顶层装配构建独立的资源绑定图，并在日志 span 中记录会话
//! - **日志配置**: 基于 `tracing-subscriber` 的日志初始化
//!
//! ## 基本使用
//!
//! ```rust,ignore
//! use wiring_composition::{AggregateDescription, ComponentAssembler, PrimitiveDescription};
//! use di_impl::ResourceClass;
//!
//! let assembler = ComponentAssembler::new();
//! let cache = assembler.cache();
//!
//! let aggregate = AggregateDescription::new()
//!     .with_child("tokenizer", PrimitiveDescription::of::<Tokenizer>(cache)?)?
//!     .with_child("tagger", PrimitiveDescription::of::<Tagger>(cache)?)?
//!     .bind_resource("Model", ResourceClass::<Model>::new(cache)?.into_specifier());
//!
//! let assembled = assembler.assemble_aggregate(&aggregate)?;
//! let tagger: &Tagger = assembled.component("tagger").unwrap();
//! ```

pub mod aggregate;
pub mod assembler;
pub mod description;
pub mod logging;
pub mod session;

// 重新导出主要类型
pub use aggregate::AssembledAggregate;
pub use assembler::ComponentAssembler;
pub use description::{AggregateDescription, ChildDescription, PrimitiveDescription};
pub use logging::{init_logging, LoggingConfig};
pub use session::AssemblySession;

// 重新导出错误类型
pub use wiring_common::{WiringError, WiringResult};
