use component_macros::Component;

#[allow(dead_code)]
#[derive(Default, Component)]
struct Tagger {
    #[resource(key = "Model")]
    model: String,
}

fn main() {}
