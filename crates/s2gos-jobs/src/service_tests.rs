use super::*;
use s2gos_protocols::{MaxOccurs, Schema};
use serde_json::json;

fn service() -> LocalService {
    let service = LocalService::new("test service");
    service
        .register_process(
            ProcessFunction::builder("tests::scale")
                .param::<f64>("value")
                .param_with_default::<f64>("factor", 2.0)
                .param::<Option<String>>("label")
                .param::<Vec<i64>>("counts")
                .returns::<f64>()
                .body(|_ctx, mut args| {
                    let value: f64 = args.take("value")?;
                    let factor: f64 = args.take("factor")?;
                    Ok(value * factor)
                }),
            RegisterOptions::new().with_id("scale").with_input(
                "counts",
                InputDescription::new(Schema::integer()).with_occurs(0, MaxOccurs::Count(3)),
            ),
        )
        .unwrap();
    service
}

fn resolve(service: &LocalService, inputs: Value) -> Result<Arguments, ServiceError> {
    let process = service.registry().get_process("scale").unwrap();
    let inputs: IndexMap<String, Value> = serde_json::from_value(inputs).unwrap();
    service.resolve_inputs(&process, inputs)
}

#[test]
fn test_resolve_fills_defaults() {
    let service = service();
    let args = resolve(&service, json!({"value": 1.5})).unwrap();
    assert_eq!(args.get("value"), Some(&json!(1.5)));
    assert_eq!(args.get("factor"), Some(&json!(2.0)));
    assert!(args.get("label").is_none());
    assert!(args.get("counts").is_none());
}

#[test]
fn test_resolve_rejects_unknown_inputs() {
    let service = service();
    let process = service.registry().get_process("scale").unwrap();
    let inputs: IndexMap<String, Value> = [
        ("value", json!(1)),
        ("speed", json!(3)),
        ("colour", json!("red")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    let err = service.resolve_inputs(&process, inputs).unwrap_err();
    assert_eq!(
        err,
        ServiceError::Validation("Unknown input(s) for process 'scale': speed, colour".to_string())
    );
}

#[test]
fn test_resolve_rejects_missing_inputs() {
    let service = service();
    let err = resolve(&service, json!({"factor": 3.0})).unwrap_err();
    assert_eq!(
        err,
        ServiceError::Validation("Missing required input(s) for process 'scale': value".to_string())
    );
}

#[test]
fn test_resolve_rejects_wrong_type() {
    let service = service();
    let err = resolve(&service, json!({"value": "big"})).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(err.to_string().contains("Input 'value' is invalid"));
}

#[test]
fn test_resolve_accepts_null_for_nullable() {
    let service = service();
    let args = resolve(&service, json!({"value": 1, "label": null})).unwrap();
    assert_eq!(args.get("label"), Some(&Value::Null));
}

#[test]
fn test_resolve_multiple_occurrences() {
    let service = service();

    let args = resolve(&service, json!({"value": 1, "counts": 4})).unwrap();
    assert_eq!(args.get("counts"), Some(&json!([4])));

    let args = resolve(&service, json!({"value": 1, "counts": [1, 2, 3]})).unwrap();
    assert_eq!(args.get("counts"), Some(&json!([1, 2, 3])));

    let err = resolve(&service, json!({"value": 1, "counts": [1, 2, 3, 4]})).unwrap_err();
    assert!(err.to_string().contains("occurrences"));

    let err = resolve(&service, json!({"value": 1, "counts": [1, "two"]})).unwrap_err();
    assert!(err.to_string().contains("occurrence 1"));
}

#[test]
fn test_register_reports_process_id() {
    let service = LocalService::new("test service");
    let id = service
        .register_process(
            ProcessFunction::builder("tests::noop").body(|_ctx, _args| Ok(())),
            RegisterOptions::new(),
        )
        .unwrap();
    assert_eq!(id, "tests::noop");
    assert!(service.registry().get("tests::noop").is_some());
}
