//! 聚合装配示例
//!
//! 两个标注组件共享同一个模型资源，嵌套流水线通过外部绑定获得自己的模型。

use component_macros::Component;
use di_impl::ResourceClass;
use std::sync::Arc;
use wiring_common::{BoxError, DataResource, SharedResourceObject};
use wiring_composition::{
    init_logging, AggregateDescription, ComponentAssembler, LoggingConfig, PrimitiveDescription,
};

#[derive(Debug, Default, Component)]
struct Model {
    #[parameter(optional, default = "default")]
    name: String,
    source: Option<String>,
}

impl SharedResourceObject for Model {
    fn load(&mut self, data: Option<&DataResource>) -> Result<(), BoxError> {
        self.source = data.map(|d| d.uri.clone());
        Ok(())
    }
}

#[derive(Debug, Default, Component)]
#[component(init = "report")]
struct Tagger {
    #[parameter(description = "置信度阈值", default = 0.5)]
    threshold: f64,
    #[parameter(optional, default = ["NN", "VB", "JJ"])]
    tags: Vec<String>,
    #[resource(key = "Model")]
    model: Option<Arc<Model>>,
}

impl Tagger {
    fn report(&mut self) -> Result<(), BoxError> {
        let model = self.model.as_ref().ok_or("模型未注入")?;
        tracing::info!(
            "标注器就绪: 阈值 {}, {} 个标签, 模型 {} ({:?})",
            self.threshold,
            self.tags.len(),
            model.name,
            model.source
        );
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(&LoggingConfig::development())?;

    let assembler = ComponentAssembler::new();
    let cache = assembler.cache();

    let pipeline = AggregateDescription::new()
        .with_child("tagger", PrimitiveDescription::of::<Tagger>(cache)?)?;

    let aggregate = AggregateDescription::new()
        .with_child("left", PrimitiveDescription::of::<Tagger>(cache)?)?
        .with_child("right", PrimitiveDescription::of::<Tagger>(cache)?)?
        .with_child("pipeline", pipeline)?
        .with_parameter("right", "threshold", 0.8)?
        .bind_resource(
            "Model",
            ResourceClass::<Model>::new(cache)?
                .with_parameter("name", "shared")
                .with_data_location("file:///models/shared.bin")
                .into_specifier(),
        )
        .bind_resource_for(
            &["pipeline"],
            "Model",
            ResourceClass::<Model>::new(cache)?
                .with_parameter("name", "nested")
                .into_specifier(),
        );

    let assembled = assembler.assemble_aggregate(&aggregate)?;
    for path in assembled.paths() {
        if let Some(tagger) = assembled.component::<Tagger>(path) {
            println!("{} -> 阈值 {}", path, tagger.threshold);
        }
    }
    println!("资源键: {:?}", assembled.graph().keys());
    Ok(())
}
