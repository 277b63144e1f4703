use fncat_invocation::{
	ConversionFacade, Data, ElementType, FunctionError, FunctionKind, FunctionType, Payload, Port,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::{CatalogConfig, FunctionRegistration, FunctionRegistry, ResolveError};

fn catalog() -> FunctionRegistry {
	let registry = FunctionRegistry::new(ConversionFacade::new());
	for registration in [
		FunctionRegistration::function("upper", |s: String| s.to_uppercase()).alias("uppercase"),
		FunctionRegistration::function("rev", |s: String| s.chars().rev().collect::<String>()),
		FunctionRegistration::function("len", |s: String| s.len() as i64),
		FunctionRegistration::supplier("words", || "hello".to_owned()),
		FunctionRegistration::consumer("sink", |_: String| {}),
		FunctionRegistration::erased(
			"k",
			FunctionType::transformer(
				Port::raw(ElementType::foreign("KStream")),
				Port::raw(ElementType::foreign("KStream")),
			),
			|_: Data| -> Result<Data, FunctionError> { unreachable!("foreign stages are never invoked") },
		),
	] {
		registry.register(registration).unwrap();
	}
	registry
}

#[test]
fn test_composite_descriptor_spans_outer_ports() {
	let registry = catalog();
	let wrapper = registry.lookup_strict(" uppercase | rev | len ").unwrap();

	assert_eq!(wrapper.definition(), "uppercase|rev|len");
	assert_eq!(wrapper.stage_names(), ["uppercase", "rev", "len"]);
	assert!(wrapper.is_composite());
	assert_eq!(wrapper.function_type().to_string(), "text -> int");
}

#[test]
fn test_producer_first_composite_is_producer() {
	let registry = catalog();
	let wrapper = registry.lookup_strict("words|rev").unwrap();
	assert_eq!(wrapper.function_type().kind(), FunctionKind::Producer);
}

#[rstest]
#[case::missing_middle("upper|nope|rev", "nope")]
#[case::missing_first("nope|rev", "nope")]
fn test_missing_segment(#[case] definition: &str, #[case] missing: &str) {
	let registry = catalog();
	assert_eq!(
		registry.lookup_strict(definition).unwrap_err(),
		ResolveError::DoesNotExist(missing.into())
	);
	assert!(registry.lookup(definition).unwrap().is_none());
}

#[test]
fn test_composite_segments_never_use_shortcut() {
	let registry = FunctionRegistry::new(ConversionFacade::new());
	registry
		.register(FunctionRegistration::function("upper", |s: String| s.to_uppercase()))
		.unwrap();

	assert!(registry.lookup("upper|upper").unwrap().is_some());
	assert!(registry.lookup("upper|other").unwrap().is_none());
}

#[rstest]
#[case("k")]
#[case("k|upper")]
#[case("upper|k")]
fn test_foreign_stage_is_unsupported(#[case] definition: &str) {
	let registry = catalog();
	for result in [registry.lookup(definition), registry.lookup_strict(definition).map(Some)] {
		assert!(
			matches!(result, Err(ResolveError::Unsupported { ref function, .. }) if function == "k"),
			"{definition}: {result:?}"
		);
	}
}

#[test]
fn test_foreign_sole_registration_is_unsupported() {
	let registry = FunctionRegistry::new(ConversionFacade::new());
	registry
		.register(FunctionRegistration::erased(
			"k",
			FunctionType::consumer(Port::raw(ElementType::foreign("KTable")).in_sequence()),
			|_: Data| -> Result<Data, FunctionError> { Ok(Data::Empty) },
		))
		.unwrap();
	assert!(matches!(registry.lookup("anything"), Err(ResolveError::Unsupported { .. })));
}

#[rstest]
#[case::consumer_upstream("sink|upper", "sink", "upper")]
#[case::producer_downstream("upper|words", "upper", "words")]
#[case::element_mismatch("len|upper", "len", "upper")]
fn test_incompatible_junctions(#[case] definition: &str, #[case] upstream: &str, #[case] downstream: &str) {
	let registry = catalog();
	match registry.lookup(definition).unwrap_err() {
		ResolveError::Incompatible {
			upstream: up, downstream: down, ..
		} => assert_eq!((up.as_str(), down.as_str()), (upstream, downstream)),
		other => panic!("expected incompatible, got {other:?}"),
	}
}

#[test]
fn test_open_ended_requires_producer() {
	let registry = catalog();

	let wrapper = registry.lookup_strict("words|").unwrap();
	assert_eq!(wrapper.definition(), "words|");
	let out = wrapper.get().unwrap().into_item().unwrap().into_payload();
	assert_eq!(out, Payload::from("hello"));

	assert!(registry.lookup_strict("words|rev|").is_ok());
	assert!(matches!(
		registry.lookup_strict("upper|"),
		Err(ResolveError::Incompatible { ref downstream, .. }) if downstream.is_empty()
	));
}

#[rstest]
#[case("|")]
#[case("upper||rev")]
#[case("|upper")]
fn test_malformed_definitions(#[case] definition: &str) {
	let registry = catalog();
	assert!(matches!(registry.lookup(definition), Err(ResolveError::Malformed { .. })));
	assert!(matches!(registry.lookup_strict(definition), Err(ResolveError::Malformed { .. })));
}

#[test]
fn test_empty_identifier_uses_configured_definition() {
	let config = CatalogConfig::from_toml(r#"definition = "upper|rev""#).unwrap();
	let registry = FunctionRegistry::with_config(ConversionFacade::new(), config);
	registry
		.register(FunctionRegistration::function("upper", |s: String| s.to_uppercase()))
		.unwrap();
	registry
		.register(FunctionRegistration::function("rev", |s: String| s.chars().rev().collect::<String>()))
		.unwrap();

	let wrapper = registry.lookup_strict("  ").unwrap();
	assert_eq!(wrapper.definition(), "upper|rev");

	// Without a configured definition an empty identifier names nothing.
	let bare = catalog();
	assert_eq!(bare.lookup_strict("").unwrap_err(), ResolveError::DoesNotExist(String::new()));
	assert!(bare.lookup("").unwrap().is_none());
}
