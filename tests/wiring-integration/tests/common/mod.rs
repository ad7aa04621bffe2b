//! 集成测试共用的组件与资源

#![allow(dead_code)]

use component_macros::Component;
use config_impl::DescriptorCache;
use di_abstractions::ResourceSpecifier;
use di_impl::ResourceClass;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiring_common::{BoxError, DataResource, SharedResourceObject};
use wiring_composition::{init_logging, LoggingConfig};

/// 初始化测试日志，重复调用时忽略
pub fn setup_logging() {
    let _ = init_logging(&LoggingConfig::development());
}

#[derive(Debug, Default, Component)]
pub struct Classifier {
    #[parameter(description = "判定阈值")]
    pub threshold: f64,
    #[parameter(optional, default = [1, 2, 3])]
    pub ids: Vec<i32>,
    #[parameter(optional, default = "en")]
    pub language: String,
}

#[derive(Debug, Default, Component)]
pub struct Lexicon {
    #[parameter(optional, default = ["NN", "VB"])]
    pub tags: Vec<String>,
}

impl SharedResourceObject for Lexicon {}

#[derive(Debug, Default, Component)]
pub struct Model {
    #[parameter(optional, default = "model.bin")]
    pub path: String,
    #[resource(key = "Lexicon", optional)]
    pub lexicon: Option<Arc<Lexicon>>,
    pub loads: Arc<AtomicUsize>,
    pub data: Option<String>,
}

impl SharedResourceObject for Model {
    fn load(&mut self, data: Option<&DataResource>) -> Result<(), BoxError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.data = data.map(|d| d.uri.clone());
        Ok(())
    }
}

#[derive(Debug, Default, Component)]
#[component(init = "warm_up")]
pub struct Tagger {
    #[parameter(optional, default = 0.5)]
    pub threshold: f64,
    #[resource(key = "Model")]
    pub model: Option<Arc<Model>>,
    #[resource(key = "Lexicon", optional)]
    pub lexicon: Option<Arc<Lexicon>>,
    pub ready: bool,
}

impl Tagger {
    fn warm_up(&mut self) -> Result<(), BoxError> {
        self.ready = self.model.is_some();
        Ok(())
    }
}

#[derive(Debug, Default, Component)]
#[component(init = "check")]
pub struct Strict {
    #[parameter(optional, default = false)]
    pub accept: bool,
}

impl Strict {
    fn check(&mut self) -> Result<(), BoxError> {
        if self.accept {
            Ok(())
        } else {
            Err("拒绝初始化".into())
        }
    }
}

#[derive(Debug, Default, Component)]
pub struct CycleA {
    #[resource(key = "B")]
    pub b: Option<Arc<CycleB>>,
}

impl SharedResourceObject for CycleA {}

#[derive(Debug, Default, Component)]
pub struct CycleB {
    #[resource(key = "A")]
    pub a: Option<Arc<CycleA>>,
}

impl SharedResourceObject for CycleB {}

#[derive(Debug, Default, Component)]
pub struct CycleConsumer {
    #[resource(key = "A")]
    pub a: Option<Arc<CycleA>>,
}

/// 计数 `load` 调用次数的模型资源说明
pub fn model_class(cache: &DescriptorCache, loads: &Arc<AtomicUsize>) -> ResourceSpecifier {
    let loads = loads.clone();
    ResourceClass::with_constructor(cache, move || Model {
        loads: loads.clone(),
        ..Model::default()
    })
    .expect("模型描述符应当有效")
    .into_specifier()
}

pub fn load_count(loads: &Arc<AtomicUsize>) -> usize {
    loads.load(Ordering::SeqCst)
}
