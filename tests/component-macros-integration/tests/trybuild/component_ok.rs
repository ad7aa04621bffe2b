use component_macros::Component;
use std::sync::Arc;
use wiring_common::{AnnotationScanner, BoxError};

struct Model;

#[derive(Default, Component)]
#[component(init = "setup")]
struct Tagger {
    #[parameter(description = "置信度阈值", default = 0.5)]
    threshold: f64,
    #[parameter(name = "lang", optional, default = "en")]
    language: String,
    #[parameter(optional, default = [-1, 2, 3])]
    offsets: Vec<i64>,
    #[parameter(optional)]
    verbose: Option<bool>,
    #[parameter(setter, optional)]
    limit: usize,
    #[resource(key = "Model")]
    model: Option<Arc<Model>>,
    #[resource(optional, setter = "attach_cache")]
    cache: Option<Arc<String>>,
    ready: bool,
}

impl Tagger {
    fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    fn attach_cache(&mut self, cache: Arc<String>) {
        self.cache = Some(cache);
    }

    fn setup(&mut self) -> Result<(), BoxError> {
        self.ready = true;
        Ok(())
    }
}

fn main() {
    let attributes = AnnotationScanner::scan::<Tagger>().unwrap();
    assert_eq!(attributes.len(), 7);

    let tagger = Tagger::default();
    assert!(!tagger.ready);
    assert!(tagger.model.is_none());
}
