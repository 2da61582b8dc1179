use serde_json::json;

use super::*;

#[test]
fn test_registry_rejects_duplicates() {
    let mut registry = SchemaRegistry::new();
    registry
        .register(SchemaDescriptor::new("Thing").field("a", TypeExpr::int()))
        .unwrap();

    let err = registry
        .register(SchemaDescriptor::new("Thing"))
        .unwrap_err();
    assert_eq!(err, SchemaError::DuplicateSchema("Thing".to_string()));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_registry_unknown_lookup() {
    let registry = SchemaRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(
        registry.lookup("Nope").unwrap_err(),
        SchemaError::UnknownSchema("Nope".to_string())
    );
}

#[test]
fn test_default_registry_holds_orso_types() {
    let names = registry().names();
    for expected in [
        "Orso",
        "DataSource",
        "Reduction",
        "Column",
        "ErrorColumn",
        "Value",
        "ValueRange",
        "ValueVector",
        "ComplexValue",
        "ErrorValue",
        "Person",
        "File",
        "Experiment",
        "Sample",
        "InstrumentSettings",
        "Measurement",
        "Software",
    ] {
        assert!(names.contains(&expected), "missing {}", expected);
    }

    let root = registry().lookup(ROOT_SCHEMA).unwrap();
    assert_eq!(root.fields()[0].name, "data_source");
    assert!(root.is_optional(DATA_SET_FIELD));
    assert!(!root.is_optional(COLUMNS_FIELD));
}

#[test]
fn test_matches_kind() {
    assert!(TypeExpr::int().matches_kind(&json!(3)));
    assert!(!TypeExpr::int().matches_kind(&json!(3.5)));
    assert!(TypeExpr::float().matches_kind(&json!(3.5)));
    assert!(!TypeExpr::float().matches_kind(&json!("3.5")));
    assert!(TypeExpr::optional(TypeExpr::str()).matches_kind(&json!(null)));
    assert!(TypeExpr::record("Value").matches_kind(&json!({"magnitude": 1.0})));
    assert!(TypeExpr::tuple(vec![TypeExpr::int()]).matches_kind(&json!([1])));
    assert!(TypeExpr::literal(&["a"]).matches_kind(&json!("b")));
}

#[test]
fn test_sequence_item_unwraps() {
    let ty = TypeExpr::optional(TypeExpr::list(TypeExpr::union(vec![
        TypeExpr::record("File"),
        TypeExpr::str(),
    ])));
    assert!(matches!(ty.sequence_item(4), Some(TypeExpr::Union(_))));

    let tuple = TypeExpr::tuple(vec![TypeExpr::int(), TypeExpr::str()]);
    assert_eq!(tuple.sequence_item(1), Some(&TypeExpr::str()));
    assert_eq!(tuple.sequence_item(2), None);
    assert_eq!(tuple.tuple_arity(), Some(2));
    assert_eq!(TypeExpr::float().sequence_item(0), None);
}

#[test]
fn test_admits_record() {
    let ty = TypeExpr::union(vec![TypeExpr::record("Column"), TypeExpr::record("ErrorColumn")]);
    assert!(ty.admits_record("ErrorColumn"));
    assert!(!ty.admits_record("Value"));
    assert!(TypeExpr::any().admits_record("Value"));
}

#[test]
fn test_type_display() {
    let ty = TypeExpr::optional(TypeExpr::union(vec![
        TypeExpr::literal(&["po", "mo"]),
        TypeExpr::record("ValueVector"),
    ]));
    assert_eq!(ty.to_string(), "('po' | 'mo' | ValueVector)?");
    assert_eq!(
        TypeExpr::map(TypeExpr::str(), TypeExpr::list(TypeExpr::float())).to_string(),
        "{str: [float]}"
    );
}

#[test]
fn test_designate_line() {
    assert_eq!(
        designate("1.0"),
        "# ORSO reflectivity data file | 1.0 standard | YAML encoding | https://www.reflectometry.org/"
    );
}
