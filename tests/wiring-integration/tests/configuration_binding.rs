//! 配置绑定与并发装配集成测试

mod common;

use anyhow::Result;
use common::*;
use config_impl::{ConfigurationParameters, ParameterSource, ValueOrigin};
use di_abstractions::AssemblyContext;
use di_impl::ResourceBindingGraph;
use std::io::Write;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::thread;
use wiring_common::WiringError;
use wiring_composition::{AggregateDescription, ComponentAssembler, PrimitiveDescription};

#[test]
fn test_mandatory_threshold_must_be_supplied() -> Result<()> {
    setup_logging();
    let assembler = ComponentAssembler::new();
    let graph = ResourceBindingGraph::new();
    let root = AssemblyContext::root();

    let err = assembler
        .assemble::<Classifier>(&ConfigurationParameters::new(), &graph, &root)
        .unwrap_err();
    assert!(matches!(
        err,
        WiringError::MissingMandatoryParameter { parameter, .. } if parameter == "threshold"
    ));

    let classifier = assembler.assemble::<Classifier>(
        &ConfigurationParameters::new().with("threshold", 0.75),
        &graph,
        &root,
    )?;
    assert_eq!(classifier.threshold, 0.75);
    Ok(())
}

#[test]
fn test_integer_array_default_is_bound() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let classifier = assembler.assemble::<Classifier>(
        &ConfigurationParameters::new().with("threshold", 0.1),
        &ResourceBindingGraph::new(),
        &AssemblyContext::root(),
    )?;
    assert_eq!(classifier.ids, vec![1, 2, 3]);
    assert_eq!(classifier.language, "en");
    Ok(())
}

#[test]
fn test_scalar_override_for_array_parameter_is_wrapped() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let classifier = assembler.assemble::<Classifier>(
        &ConfigurationParameters::new()
            .with("threshold", 0.1)
            .with("ids", 7),
        &ResourceBindingGraph::new(),
        &AssemblyContext::root(),
    )?;
    assert_eq!(classifier.ids, vec![7]);
    Ok(())
}

#[test]
fn test_wrong_override_type_is_a_mismatch() {
    let assembler = ComponentAssembler::new();
    let err = assembler
        .assemble::<Classifier>(
            &ConfigurationParameters::new().with("threshold", "high"),
            &ResourceBindingGraph::new(),
            &AssemblyContext::root(),
        )
        .unwrap_err();
    assert!(matches!(err, WiringError::TypeMismatch { parameter, .. } if parameter == "threshold"));
}

#[test]
fn test_resolved_configuration_reports_origins() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let descriptor = assembler.cache().get_or_build::<Classifier>()?;
    let resolved = config_impl::ConfigurationBinder::new().resolve(
        &descriptor,
        &ConfigurationParameters::new().with("threshold", 0.3),
    )?;
    assert_eq!(resolved.origin("threshold"), Some(ValueOrigin::Override));
    assert_eq!(resolved.origin("ids"), Some(ValueOrigin::Default));
    Ok(())
}

#[test]
fn test_file_overrides_feed_aggregate_children() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("pipeline.toml");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "[classifier]")?;
    writeln!(file, "threshold = 0.6")?;
    writeln!(file, "ids = [4, 5]")?;
    writeln!(file, "[tagger]")?;
    writeln!(file, "threshold = 0.9")?;
    drop(file);

    let source = ParameterSource::new().add_file(&path);
    let assembler = ComponentAssembler::new();
    let loads = Arc::new(AtomicUsize::new(0));

    let aggregate = AggregateDescription::new()
        .with_child(
            "classifier",
            PrimitiveDescription::of::<Classifier>(assembler.cache())?
                .with_parameters(&source.load("classifier")?),
        )?
        .with_child(
            "tagger",
            PrimitiveDescription::of::<Tagger>(assembler.cache())?
                .with_parameters(&source.load("tagger")?),
        )?
        .with_parameter("classifier", "language", "de")?
        .bind_resource("Model", model_class(assembler.cache(), &loads));

    let assembled = assembler.assemble_aggregate(&aggregate)?;
    let classifier = assembled
        .component::<Classifier>("classifier")
        .expect("classifier");
    assert_eq!(classifier.threshold, 0.6);
    assert_eq!(classifier.ids, vec![4, 5]);
    assert_eq!(classifier.language, "de");

    let tagger = assembled.component::<Tagger>("tagger").expect("tagger");
    assert_eq!(tagger.threshold, 0.9);
    Ok(())
}

#[test]
fn test_missing_required_file_is_a_source_error() {
    let source = ParameterSource::new().add_file("/nonexistent/pipeline.toml");
    let err = source.load("classifier").unwrap_err();
    assert!(matches!(err, WiringError::ConfigurationSource { .. }));
}

#[test]
fn test_concurrent_assemblies_are_isolated() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let loads = Arc::new(AtomicUsize::new(0));
    let aggregate = AggregateDescription::new()
        .with_child("left", PrimitiveDescription::of::<Tagger>(assembler.cache())?)?
        .with_child("right", PrimitiveDescription::of::<Tagger>(assembler.cache())?)?
        .bind_resource("Model", model_class(assembler.cache(), &loads));

    let results: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let assembled = assembler.assemble_aggregate(&aggregate)?;
                    let left = assembled.component::<Tagger>("left").and_then(|t| t.model.clone());
                    let right = assembled.component::<Tagger>("right").and_then(|t| t.model.clone());
                    Ok::<_, WiringError>(match (left, right) {
                        (Some(left), Some(right)) => Arc::ptr_eq(&left, &right),
                        _ => false,
                    })
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("装配线程崩溃"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    assert_eq!(results, vec![true; 8]);
    assert_eq!(load_count(&loads), 8);
    assert_eq!(assembler.cache().len(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_assembly_from_blocking_tasks() -> Result<()> {
    let assembler = ComponentAssembler::new();
    let loads = Arc::new(AtomicUsize::new(0));
    let aggregate = AggregateDescription::new()
        .with_child("tagger", PrimitiveDescription::of::<Tagger>(assembler.cache())?)?
        .bind_resource("Model", model_class(assembler.cache(), &loads));

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let assembler = assembler.clone();
        let aggregate = aggregate.clone();
        tasks.push(tokio::task::spawn_blocking(move || {
            assembler
                .assemble_aggregate(&aggregate)
                .map(|assembled| assembled.len())
        }));
    }

    for task in tasks {
        assert_eq!(task.await??, 1);
    }
    assert_eq!(load_count(&loads), 4);
    Ok(())
}
