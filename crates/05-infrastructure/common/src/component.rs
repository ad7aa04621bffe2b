//! 组件基础接口定义
//!
//! 组件通过 [`Component`] 声明自己的参数与资源依赖表，并提供写入参数、注入资源的入口。
//! 通常由 `component-macros` 的 `#[derive(Component)]` 在编译期生成。

use crate::errors::{BoxError, WiringResult};
use crate::scanner::AttributeScan;
use crate::value::ParameterValue;
use std::any::Any;
use std::sync::Arc;

/// 共享资源实例
///
/// 资源图持有实例，组件持有同一实例的 `Arc` 句柄。
pub type SharedResource = Arc<dyn Any + Send + Sync>;

/// 组件基础 trait
pub trait Component: Send + Sync + 'static {
    /// 声明组件的全部标记属性（包括嵌入的基础组件）
    fn scan(scan: &mut AttributeScan)
    where
        Self: Sized;

    /// 将解析后的参数值写入属性
    ///
    /// 无法处理的属性路径返回 `BindingTarget` 错误。
    fn apply_parameter(&mut self, attribute: &str, value: &ParameterValue) -> WiringResult<()>;

    /// 将共享资源注入属性
    fn inject_resource(&mut self, attribute: &str, resource: SharedResource) -> WiringResult<()>;

    /// 生命周期初始化钩子，在配置绑定和资源注入完成之后调用
    fn initialize(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// 类型擦除后的组件
pub trait AnyComponent: Component {
    /// 以 `Any` 形式访问
    fn as_any(&self) -> &dyn Any;

    /// 以可变 `Any` 形式访问
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 组件类型名
    fn component_type(&self) -> &'static str;
}

impl<T: Component> AnyComponent for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn component_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// 资源的后备数据位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataResource {
    /// 数据 URI
    pub uri: String,
}

impl DataResource {
    /// 创建新的数据位置
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// 可共享的资源对象
///
/// 资源本身也是组件：先绑定配置、注入它依赖的资源，再调用一次 `load`。
/// 读取后备数据等 I/O 全部在 `load` 中完成。
pub trait SharedResourceObject: Component {
    /// 加载钩子，每个构建出的实例恰好调用一次
    fn load(&mut self, data: Option<&DataResource>) -> Result<(), BoxError> {
        let _ = data;
        Ok(())
    }
}
