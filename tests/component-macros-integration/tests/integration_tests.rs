//! 派生宏集成测试

use anyhow::Result;
use component_macros::Component;
use config_impl::{ConfigurationBinder, ConfigurationParameters, DescriptorCache};
use di_abstractions::{AssemblyContext, ResourceSpecifier};
use di_impl::{ResourceBindingGraph, ResourceInjector};
use std::sync::Arc;
use wiring_common::{
    BoxError, Component as _, ParameterType, ParameterValue, WiringError,
};

#[derive(Debug, PartialEq)]
pub struct Model {
    pub name: String,
}

#[derive(Debug, Default, Component)]
#[component(init = "on_init")]
pub struct BaseAnnotator {
    #[parameter(optional, default = 0.25)]
    threshold: f64,
    #[parameter(optional, default = 10)]
    window: i32,
    #[parameter(optional)]
    source: Option<String>,
    initialized: bool,
}

impl BaseAnnotator {
    fn on_init(&mut self) -> Result<(), BoxError> {
        self.initialized = true;
        Ok(())
    }
}

#[derive(Debug, Default, Component)]
#[component(init = "setup")]
pub struct Tagger {
    #[inherit]
    base: BaseAnnotator,
    #[parameter(description = "置信度阈值")]
    threshold: f32,
    #[parameter(name = "lang", optional, default = "en")]
    language: String,
    #[parameter(optional, default = [1, 2, 3])]
    ids: Vec<i64>,
    #[parameter(optional)]
    verbose: Option<bool>,
    #[parameter(optional, setter)]
    max_tokens: u8,
    #[resource(key = "Model")]
    model: Option<Arc<Model>>,
    #[resource(optional, setter = "attach_lexicon")]
    lexicon: Option<Arc<Vec<String>>>,
    init_order: Vec<&'static str>,
}

impl Tagger {
    fn set_max_tokens(&mut self, max_tokens: u8) {
        self.max_tokens = max_tokens;
    }

    fn attach_lexicon(&mut self, lexicon: Arc<Vec<String>>) {
        self.lexicon = Some(lexicon);
    }

    fn setup(&mut self) -> Result<(), BoxError> {
        if self.base.initialized {
            self.init_order.push("base");
        }
        self.init_order.push("tagger");
        if self.model.is_none() {
            return Err("模型未注入".into());
        }
        Ok(())
    }
}

fn bind(parameters: &ConfigurationParameters) -> Result<Tagger, WiringError> {
    let cache = DescriptorCache::new();
    let descriptor = cache.get_or_build::<Tagger>()?;
    let mut tagger = Tagger::default();
    ConfigurationBinder::new().bind(&mut tagger, &descriptor, parameters)?;
    Ok(tagger)
}

#[test]
fn test_descriptor_reflects_field_markers() -> Result<()> {
    let cache = DescriptorCache::new();
    let descriptor = cache.get_or_build::<Tagger>()?;

    let threshold = descriptor.parameter("threshold").expect("threshold");
    assert_eq!(threshold.parameter_type, ParameterType::Float);
    assert!(threshold.mandatory);
    assert_eq!(threshold.attribute, "threshold");
    assert_eq!(threshold.description.as_deref(), Some("置信度阈值"));

    let language = descriptor.parameter("lang").expect("lang");
    assert_eq!(language.attribute, "language");
    assert_eq!(language.coerced_default, Some(ParameterValue::String("en".into())));

    let ids = descriptor.parameter("ids").expect("ids");
    assert!(ids.multi_valued);
    assert_eq!(ids.coerced_default, Some(ParameterValue::IntegerArray(vec![1, 2, 3])));

    let window = descriptor.parameter("window").expect("window");
    assert_eq!(window.attribute, "base.window");

    assert_eq!(descriptor.resource_keys(), vec!["Model", "lexicon"]);
    let lexicon = descriptor.resource("lexicon").expect("lexicon");
    assert!(!lexicon.mandatory);
    Ok(())
}

#[test]
fn test_derived_parameter_shadows_base() -> Result<()> {
    let cache = DescriptorCache::new();
    let descriptor = cache.get_or_build::<Tagger>()?;

    let thresholds: Vec<_> = descriptor
        .parameters
        .iter()
        .filter(|p| p.name == "threshold")
        .collect();
    assert_eq!(thresholds.len(), 1);
    assert_eq!(thresholds[0].attribute, "threshold");
    assert_eq!(
        thresholds[0].attributes().collect::<Vec<_>>(),
        vec!["threshold", "base.threshold"]
    );

    let tagger = bind(&ConfigurationParameters::new().with("threshold", 0.75))?;
    assert_eq!(tagger.threshold, 0.75);
    assert_eq!(tagger.base.threshold, 0.75);
    Ok(())
}

#[test]
fn test_mandatory_parameter_missing() {
    let err = bind(&ConfigurationParameters::new()).unwrap_err();
    assert!(matches!(
        err,
        WiringError::MissingMandatoryParameter { parameter, .. } if parameter == "threshold"
    ));
}

#[test]
fn test_defaults_and_overrides_are_written() -> Result<()> {
    let parameters = ConfigurationParameters::new()
        .with("threshold", 0.5)
        .with("window", 32)
        .with("source", "corpus")
        .with("max_tokens", 64);
    let tagger = bind(&parameters)?;

    assert_eq!(tagger.language, "en");
    assert_eq!(tagger.ids, vec![1, 2, 3]);
    assert_eq!(tagger.verbose, None);
    assert_eq!(tagger.max_tokens, 64);
    assert_eq!(tagger.base.window, 32);
    assert_eq!(tagger.base.source.as_deref(), Some("corpus"));
    Ok(())
}

#[test]
fn test_integer_narrowing_is_checked() -> Result<()> {
    let cache = DescriptorCache::new();
    let descriptor = cache.get_or_build::<Tagger>()?;
    let parameters = ConfigurationParameters::new()
        .with("threshold", 0.5)
        .with("window", 32)
        .with("max_tokens", 300);

    let mut tagger = Tagger::default();
    let err = ConfigurationBinder::new()
        .bind(&mut tagger, &descriptor, &parameters)
        .unwrap_err();
    assert!(matches!(
        err,
        WiringError::TypeMismatch { parameter, .. } if parameter == "max_tokens"
    ));
    assert_eq!(tagger.threshold, 0.0);
    assert_eq!(tagger.base.window, 0);
    assert_eq!(tagger.language, "");
    Ok(())
}

#[test]
fn test_f32_overflow_is_checked() {
    let err = bind(&ConfigurationParameters::new().with("threshold", 1e39)).unwrap_err();
    assert!(matches!(
        err,
        WiringError::TypeMismatch { parameter, .. } if parameter == "threshold"
    ));
}

#[test]
fn test_unknown_attribute_is_binding_target_error() {
    let mut tagger = Tagger::default();
    let err = tagger
        .apply_parameter("missing", &ParameterValue::Boolean(true))
        .unwrap_err();
    assert!(matches!(err, WiringError::BindingTarget { .. }));

    let err = tagger
        .apply_parameter("base.missing", &ParameterValue::Boolean(true))
        .unwrap_err();
    assert!(matches!(err, WiringError::BindingTarget { attribute, .. } if attribute == "missing"));
}

#[test]
fn test_resources_are_injected_through_fields_and_setters() -> Result<()> {
    let cache = DescriptorCache::new();
    let descriptor = cache.get_or_build::<Tagger>()?;

    let mut graph = ResourceBindingGraph::new();
    graph.bind(
        "Model",
        ResourceSpecifier::instance(Model {
            name: "pos".into(),
        }),
    )?;
    graph.bind(
        "lexicon",
        ResourceSpecifier::instance(vec!["NN".to_string(), "VB".to_string()]),
    )?;

    let mut tagger = bind(&ConfigurationParameters::new().with("threshold", 0.5))?;
    let injected =
        ResourceInjector::new().inject(&mut tagger, &descriptor, &graph, &AssemblyContext::root())?;

    assert_eq!(injected.len(), 2);
    assert_eq!(tagger.model.as_ref().map(|m| m.name.as_str()), Some("pos"));
    assert_eq!(tagger.lexicon.as_ref().map(|l| l.len()), Some(2));
    Ok(())
}

#[test]
fn test_wrong_resource_type_is_rejected() -> Result<()> {
    let cache = DescriptorCache::new();
    let descriptor = cache.get_or_build::<Tagger>()?;

    let mut graph = ResourceBindingGraph::new();
    graph.bind("Model", ResourceSpecifier::instance(String::from("not a model")))?;

    let mut tagger = bind(&ConfigurationParameters::new().with("threshold", 0.5))?;
    let err = ResourceInjector::new()
        .inject(&mut tagger, &descriptor, &graph, &AssemblyContext::root())
        .unwrap_err();
    assert!(matches!(err, WiringError::TypeMismatch { parameter, .. } if parameter == "model"));
    assert!(tagger.model.is_none());
    Ok(())
}

#[test]
fn test_init_hook_runs_after_base() -> Result<()> {
    let mut tagger = Tagger {
        model: Some(Arc::new(Model {
            name: "pos".into(),
        })),
        ..Tagger::default()
    };
    assert!(tagger.initialize().is_ok());
    assert!(tagger.base.initialized);
    assert_eq!(tagger.init_order, vec!["base", "tagger"]);

    let mut bare = Tagger::default();
    assert!(bare.initialize().is_err());
    Ok(())
}
