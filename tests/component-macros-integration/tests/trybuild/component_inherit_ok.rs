use component_macros::Component;
use wiring_common::{AnnotationScanner, Component as _};

#[derive(Default, Component)]
struct BaseAnnotator {
    #[parameter(optional, default = 10)]
    window: i32,
}

#[derive(Default, Component)]
struct Chunker<T: Default + Send + Sync + 'static> {
    #[inherit]
    base: BaseAnnotator,
    #[parameter(optional)]
    labels: Vec<String>,
    marker: T,
}

fn main() {
    let attributes = AnnotationScanner::scan::<Chunker<u8>>().unwrap();
    let paths: Vec<_> = attributes.iter().map(|a| a.attribute.as_str()).collect();
    assert_eq!(paths, vec!["base.window", "labels"]);

    let mut chunker = Chunker::<u8>::default();
    chunker.initialize().unwrap();
    assert_eq!(chunker.marker, 0);
}
