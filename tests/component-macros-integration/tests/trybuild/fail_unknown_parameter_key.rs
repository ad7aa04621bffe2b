use component_macros::Component;

#[allow(dead_code)]
#[derive(Default, Component)]
struct Tagger {
    #[parameter(colour)]
    colour: String,
}

fn main() {}
