//! 聚合装配集成测试：资源共享、键解析、作用域回退与错误路径

mod common;

use anyhow::Result;
use common::*;
use di_abstractions::{AssemblyContext, ResourceKeyResolver, ResourceSpecifier};
use di_impl::{ResourceBindingGraph, ResourceClass, ResourceInjector};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use wiring_common::WiringError;
use wiring_composition::{AggregateDescription, ComponentAssembler, PrimitiveDescription};

fn tagger(assembler: &ComponentAssembler) -> Result<PrimitiveDescription> {
    Ok(PrimitiveDescription::of::<Tagger>(assembler.cache())?)
}

#[test]
fn test_siblings_share_one_loaded_model() -> Result<()> {
    setup_logging();
    let assembler = ComponentAssembler::new();
    let loads = Arc::new(AtomicUsize::new(0));

    let aggregate = AggregateDescription::new()
        .with_child("left", tagger(&assembler)?)?
        .with_child("right", tagger(&assembler)?)?
        .bind_resource("Model", model_class(assembler.cache(), &loads));

    let assembled = assembler.assemble_aggregate(&aggregate)?;
    let left = assembled.component::<Tagger>("left").expect("left");
    let right = assembled.component::<Tagger>("right").expect("right");

    let left_model = left.model.as_ref().expect("left model");
    let right_model = right.model.as_ref().expect("right model");
    assert!(Arc::ptr_eq(left_model, right_model));
    assert_eq!(load_count(&loads), 1);
    assert_eq!(assembled.graph().construction_count("Model"), 1);
    assert!(left.ready && right.ready);
    assert_eq!(assembled.paths(), vec!["left", "right"]);
    Ok(())
}

#[test]
fn test_non_sharable_resource_is_built_per_consumer() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let loads = Arc::new(AtomicUsize::new(0));

    let aggregate = AggregateDescription::new()
        .with_child("left", tagger(&assembler)?)?
        .with_child("right", tagger(&assembler)?)?
        .bind_resource(
            "Model",
            model_class(assembler.cache(), &loads).non_sharable(),
        );

    let assembled = assembler.assemble_aggregate(&aggregate)?;
    let left = assembled.component::<Tagger>("left").expect("left");
    let right = assembled.component::<Tagger>("right").expect("right");

    assert!(!Arc::ptr_eq(
        left.model.as_ref().expect("left model"),
        right.model.as_ref().expect("right model")
    ));
    assert_eq!(load_count(&loads), 2);
    Ok(())
}

#[test]
fn test_external_binding_matches_nested_lookup_key() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let loads = Arc::new(AtomicUsize::new(0));

    let pipeline = AggregateDescription::new().with_child("tagger", tagger(&assembler)?)?;
    let aggregate = AggregateDescription::new()
        .with_child("pipeline", pipeline)?
        .bind_resource_for(&["pipeline"], "Model", model_class(assembler.cache(), &loads));

    let root = AssemblyContext::root();
    let external = ResourceKeyResolver::qualify_external(&root, &["pipeline"], "Model");
    let internal = ResourceKeyResolver::qualify(&root.child("pipeline"), "Model");
    assert_eq!(external, internal);
    assert_eq!(external, "pipeline.Model");

    let assembled = assembler.assemble_aggregate(&aggregate)?;
    assert!(assembled.graph().contains_key("pipeline.Model"));
    assert!(!assembled.graph().contains_key("Model"));

    let nested = assembled
        .component::<Tagger>("pipeline.tagger")
        .expect("nested tagger");
    assert!(nested.model.is_some());

    let (resolved_key, _) = ResourceInjector::new()
        .resolve(assembled.graph(), &root.child("pipeline"), "Model")?
        .expect("resolved");
    assert_eq!(resolved_key, internal);
    assert_eq!(load_count(&loads), 1);
    Ok(())
}

#[test]
fn test_outer_binding_is_visible_to_nested_components() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let loads = Arc::new(AtomicUsize::new(0));

    let pipeline = AggregateDescription::new().with_child("tagger", tagger(&assembler)?)?;
    let aggregate = AggregateDescription::new()
        .with_child("top", tagger(&assembler)?)?
        .with_child("pipeline", pipeline)?
        .bind_resource("Model", model_class(assembler.cache(), &loads));

    let assembled = assembler.assemble_aggregate(&aggregate)?;
    let top = assembled.component::<Tagger>("top").expect("top");
    let nested = assembled
        .component::<Tagger>("pipeline.tagger")
        .expect("nested");

    assert!(Arc::ptr_eq(
        top.model.as_ref().expect("top model"),
        nested.model.as_ref().expect("nested model")
    ));
    assert_eq!(load_count(&loads), 1);
    Ok(())
}

#[test]
fn test_closer_binding_wins_over_outer_binding() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let outer_loads = Arc::new(AtomicUsize::new(0));
    let inner_loads = Arc::new(AtomicUsize::new(0));

    let pipeline = AggregateDescription::new()
        .with_child("tagger", tagger(&assembler)?)?
        .bind_resource("Model", model_class(assembler.cache(), &inner_loads));
    let aggregate = AggregateDescription::new()
        .with_child("top", tagger(&assembler)?)?
        .with_child("pipeline", pipeline)?
        .bind_resource("Model", model_class(assembler.cache(), &outer_loads));

    let assembled = assembler.assemble_aggregate(&aggregate)?;
    let top = assembled.component::<Tagger>("top").expect("top");
    let nested = assembled
        .component::<Tagger>("pipeline.tagger")
        .expect("nested");

    assert!(!Arc::ptr_eq(
        top.model.as_ref().expect("top model"),
        nested.model.as_ref().expect("nested model")
    ));
    assert_eq!(load_count(&outer_loads), 1);
    assert_eq!(load_count(&inner_loads), 1);
    Ok(())
}

#[test]
fn test_resource_dependencies_are_injected_into_resources() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let loads = Arc::new(AtomicUsize::new(0));
    let lexicon = ResourceClass::<Lexicon>::new(assembler.cache())?
        .with_parameter("tags", vec!["DT", "JJ", "NN"])
        .into_specifier();

    let aggregate = AggregateDescription::new()
        .with_child("tagger", tagger(&assembler)?)?
        .bind_resource("Lexicon", lexicon)
        .bind_resource(
            "Model",
            ResourceClass::with_constructor(assembler.cache(), {
                let loads = loads.clone();
                move || Model {
                    loads: loads.clone(),
                    ..Model::default()
                }
            })?
            .with_parameter("path", "pos.bin")
            .with_data_location("file:///models/pos.bin")
            .into_specifier(),
        );

    let assembled = assembler.assemble_aggregate(&aggregate)?;
    let tagger = assembled.component::<Tagger>("tagger").expect("tagger");
    let model = tagger.model.as_ref().expect("model");

    assert_eq!(model.path, "pos.bin");
    assert_eq!(model.data.as_deref(), Some("file:///models/pos.bin"));
    let model_lexicon = model.lexicon.as_ref().expect("model lexicon");
    assert_eq!(model_lexicon.tags, vec!["DT", "JJ", "NN"]);
    assert!(Arc::ptr_eq(
        model_lexicon,
        tagger.lexicon.as_ref().expect("tagger lexicon")
    ));
    assert_eq!(assembled.graph().construction_count("Lexicon"), 1);
    Ok(())
}

#[test]
fn test_duplicate_binding_is_rejected() -> Result<()> {
    let mut graph = ResourceBindingGraph::new();
    graph.bind("X", ResourceSpecifier::instance(1_u32))?;
    let err = graph
        .bind("X", ResourceSpecifier::instance(2_u32))
        .unwrap_err();
    assert!(matches!(err, WiringError::DuplicateBinding { key } if key == "X"));

    let assembler = ComponentAssembler::new();
    let aggregate = AggregateDescription::new()
        .with_child("tagger", tagger(&assembler)?)?
        .bind_resource("X", ResourceSpecifier::instance(1_u32))
        .bind_resource("X", ResourceSpecifier::instance(2_u32));
    let err = assembler.assemble_aggregate(&aggregate).unwrap_err();
    assert!(matches!(err, WiringError::DuplicateBinding { .. }));
    Ok(())
}

#[test]
fn test_duplicate_binding_across_levels_is_rejected() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let loads = Arc::new(AtomicUsize::new(0));

    let pipeline = AggregateDescription::new()
        .with_child("tagger", tagger(&assembler)?)?
        .bind_resource("Model", model_class(assembler.cache(), &loads));
    let aggregate = AggregateDescription::new()
        .with_child("pipeline", pipeline)?
        .bind_resource_for(&["pipeline"], "Model", model_class(assembler.cache(), &loads));

    let err = assembler.assemble_aggregate(&aggregate).unwrap_err();
    assert!(matches!(err, WiringError::DuplicateBinding { key } if key == "pipeline.Model"));
    assert_eq!(load_count(&loads), 0);
    Ok(())
}

#[test]
fn test_unbound_mandatory_resource_names_qualified_key() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let pipeline = AggregateDescription::new().with_child("tagger", tagger(&assembler)?)?;
    let aggregate = AggregateDescription::new().with_child("pipeline", pipeline)?;

    let err = assembler.assemble_aggregate(&aggregate).unwrap_err();
    assert!(matches!(err, WiringError::UnboundResource { key, .. } if key == "pipeline.Model"));
    Ok(())
}

#[test]
fn test_cyclic_resource_classes_fail_validation() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let aggregate = AggregateDescription::new()
        .with_child(
            "consumer",
            PrimitiveDescription::of::<CycleConsumer>(assembler.cache())?,
        )?
        .bind_resource("A", ResourceClass::<CycleA>::new(assembler.cache())?.into_specifier())
        .bind_resource("B", ResourceClass::<CycleB>::new(assembler.cache())?.into_specifier());

    let err = assembler.assemble_aggregate(&aggregate).unwrap_err();
    assert!(matches!(err, WiringError::CircularResourceDependency { .. }));
    Ok(())
}

#[test]
fn test_initialization_failure_is_reported() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let aggregate = AggregateDescription::new()
        .with_child("strict", PrimitiveDescription::of::<Strict>(assembler.cache())?)?;
    let err = assembler.assemble_aggregate(&aggregate).unwrap_err();
    assert!(matches!(err, WiringError::InitializationFailed { .. }));

    let accepted = AggregateDescription::new().with_child(
        "strict",
        PrimitiveDescription::of::<Strict>(assembler.cache())?.with_parameter("accept", "TRUE"),
    )?;
    let assembled = assembler.assemble_aggregate(&accepted)?;
    assert!(assembled.component::<Strict>("strict").expect("strict").accept);
    Ok(())
}

#[test]
fn test_each_assembly_builds_its_own_graph() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let loads = Arc::new(AtomicUsize::new(0));
    let aggregate = AggregateDescription::new()
        .with_child("tagger", tagger(&assembler)?)?
        .bind_resource("Model", model_class(assembler.cache(), &loads));

    let first = assembler.assemble_aggregate(&aggregate)?;
    let second = assembler.assemble_aggregate(&aggregate)?;

    assert_ne!(first.session().id, second.session().id);
    let first_model = first
        .component::<Tagger>("tagger")
        .and_then(|t| t.model.clone())
        .expect("first");
    let second_model = second
        .component::<Tagger>("tagger")
        .and_then(|t| t.model.clone())
        .expect("second");
    assert!(!Arc::ptr_eq(&first_model, &second_model));
    assert_eq!(load_count(&loads), 2);
    Ok(())
}
