use super::*;
use indexmap::IndexMap;
use serde_json::json;

#[test]
fn test_any_schema_serializes_empty() {
    let schema = Schema::any();
    assert_eq!(serde_json::to_value(&schema).unwrap(), json!({}));
    assert_eq!(schema.kind(), SchemaKind::Any);
}

#[test]
fn test_null_schema() {
    let schema = Schema::null();
    assert_eq!(serde_json::to_value(&schema).unwrap(), json!({"nullable": true}));
    assert_eq!(schema.kind(), SchemaKind::Null);
}

#[test]
fn test_scalar_kinds() {
    assert_eq!(Schema::boolean().kind(), SchemaKind::Boolean);
    assert_eq!(Schema::integer().kind(), SchemaKind::Integer);
    assert_eq!(Schema::number().kind(), SchemaKind::Number);
    assert_eq!(Schema::string().kind(), SchemaKind::String);
}

#[test]
fn test_tuple_serialization() {
    let schema = Schema::tuple(vec![Schema::integer(), Schema::string()]);
    assert_eq!(
        serde_json::to_value(&schema).unwrap(),
        json!({
            "type": "array",
            "items": [{"type": "integer"}, {"type": "string"}],
            "minItems": 2,
            "maxItems": 2
        })
    );
}

#[test]
fn test_map_serialization() {
    let schema = Schema::map(Schema::number());
    assert_eq!(
        serde_json::to_value(&schema).unwrap(),
        json!({"type": "object", "additionalProperties": {"type": "number"}})
    );
    assert_eq!(schema.kind(), SchemaKind::Object);
}

#[test]
fn test_union_kind() {
    let schema = Schema::one_of(vec![Schema::integer(), Schema::string()]).with_nullable(true);
    assert_eq!(schema.kind(), SchemaKind::Union);
    assert!(schema.is_nullable());
}

#[test]
fn test_deserialize_round_trip_items() {
    let value = json!({
        "type": "array",
        "items": {"type": "integer"},
        "default": [1, 2]
    });
    let schema: Schema = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(schema, Schema::array(Schema::integer()).with_default(json!([1, 2])));
    assert_eq!(serde_json::to_value(&schema).unwrap(), value);
}

#[test]
fn test_deserialize_enum_keyword() {
    let schema: Schema = serde_json::from_value(json!({
        "type": "string",
        "enum": ["Landsat-8", "Sentinel-2"]
    }))
    .unwrap();
    assert_eq!(
        schema.enum_values,
        Some(vec![json!("Landsat-8"), json!("Sentinel-2")])
    );
}

#[test]
fn test_check_scalars() {
    assert!(Schema::boolean().check(&json!(true)).is_ok());
    assert!(Schema::integer().check(&json!(10)).is_ok());
    assert!(Schema::integer().check(&json!(-3)).is_ok());
    assert!(Schema::integer().check(&json!(1.5)).is_err());
    assert!(Schema::number().check(&json!(1.5)).is_ok());
    assert!(Schema::number().check(&json!(2)).is_ok());
    assert!(Schema::string().check(&json!("abc")).is_ok());
    assert!(Schema::string().check(&json!(1)).is_err());
}

#[test]
fn test_check_type_mismatch_message() {
    let err = Schema::integer().check(&json!("ten")).unwrap_err();
    assert_eq!(err.path, "$");
    assert_eq!(err.message, "expected integer, got string");
}

#[test]
fn test_check_null() {
    assert!(Schema::any().check(&json!(null)).is_ok());
    assert!(Schema::integer().check(&json!(null)).is_err());
    assert!(Schema::integer().with_nullable(true).check(&json!(null)).is_ok());
}

#[test]
fn test_check_array_items() {
    let schema = Schema::array(Schema::integer());
    assert!(schema.check(&json!([1, 2, 3])).is_ok());
    let err = schema.check(&json!([1, "two"])).unwrap_err();
    assert_eq!(err.path, "$[1]");
}

#[test]
fn test_check_tuple_length() {
    let schema = Schema::tuple(vec![Schema::number(), Schema::number()]);
    assert!(schema.check(&json!([1.0, 2.0])).is_ok());
    assert!(schema.check(&json!([1.0])).is_err());
    assert!(schema.check(&json!([1.0, 2.0, 3.0])).is_err());
    assert!(schema.check(&json!([1.0, "x"])).is_err());
}

#[test]
fn test_check_object() {
    let schema = Schema::map(Schema::integer());
    assert!(schema.check(&json!({"a": 1, "b": 2})).is_ok());
    let err = schema.check(&json!({"a": 1, "b": "x"})).unwrap_err();
    assert_eq!(err.path, "$.b");

    let mut properties = IndexMap::new();
    properties.insert("name".to_string(), Schema::string());
    let mut schema = Schema::object(properties);
    schema.required = Some(vec!["name".to_string()]);
    assert!(schema.check(&json!({"name": "x", "extra": 1})).is_ok());
    assert!(schema.check(&json!({"extra": 1})).is_err());
}

#[test]
fn test_check_one_of() {
    let schema = Schema::one_of(vec![Schema::integer(), Schema::string()]);
    assert!(schema.check(&json!(1)).is_ok());
    assert!(schema.check(&json!("a")).is_ok());
    assert!(schema.check(&json!(true)).is_err());
    assert!(schema.check(&json!(null)).is_err());
    assert!(schema.with_nullable(true).check(&json!(null)).is_ok());
}

#[test]
fn test_check_enum() {
    let schema = Schema::string().with_enum(vec![json!("a"), json!("b")]);
    assert!(schema.check(&json!("a")).is_ok());
    assert!(schema.check(&json!("c")).is_err());
}
