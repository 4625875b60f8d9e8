use serde_json::json;
use transform_runner::core::validator::validate_document;
use transform_runner::domain::schema::Pattern;
use transform_runner::{FieldKind, FieldSpec, RunnerConfig, RunnerError, Schema};

fn order_schema() -> Schema {
    Schema::new()
        .deny_unknown()
        .field(
            FieldSpec::required("id", FieldKind::String)
                .with_pattern(Pattern::new("^ord-[0-9]+$").unwrap()),
        )
        .field(FieldSpec::required("total", FieldKind::Number).with_range(Some(0.0), None))
        .field(FieldSpec::optional("paid", FieldKind::Boolean))
        .field(
            FieldSpec::required("customer", FieldKind::Record).with_fields(vec![
                FieldSpec::required("name", FieldKind::String),
                FieldSpec::optional("vip", FieldKind::Boolean),
            ]),
        )
        .field(
            FieldSpec::optional("lines", FieldKind::Sequence)
                .with_items(FieldKind::Record)
                .with_fields(vec![
                    FieldSpec::required("sku", FieldKind::String),
                    FieldSpec::required("qty", FieldKind::Integer).with_range(Some(1.0), None),
                ]),
        )
}

#[test]
fn test_valid_order_passes() {
    let document = validate_document(
        json!({
            "id": "ord-17",
            "total": 12.5,
            "paid": null,
            "customer": {"name": "Ada"},
            "lines": [{"sku": "A1", "qty": 2}]
        }),
        &order_schema(),
    )
    .unwrap();

    assert_eq!(document.len(), 1);
}

#[test]
fn test_every_missing_required_field_is_listed() {
    let err = validate_document(json!({"lines": []}), &order_schema()).unwrap_err();

    let paths: Vec<&str> = err.violations().iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, vec!["id", "total", "customer"]);
    assert!(err
        .violations()
        .iter()
        .all(|v| v.reason == "required field is missing"));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_one_entry_per_distinct_violation() {
    let err = validate_document(
        json!([
            {
                "id": "order-1",
                "total": -3,
                "paid": "yes",
                "customer": {"name": 5, "vip": 1, "extra": true},
                "lines": [{"sku": "A1", "qty": 0}, {"qty": 1.5}, "oops"],
                "note": "unexpected"
            },
            7
        ]),
        &order_schema(),
    )
    .unwrap_err();

    let rendered: Vec<String> = err.violations().iter().map(|v| v.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "[0].id: value does not match pattern '^ord-[0-9]+$'",
            "[0].total: value -3 is below minimum 0",
            "[0].paid: expected boolean, found string",
            "[0].customer.name: expected string, found number",
            "[0].customer.vip: expected boolean, found number",
            "[0].customer.extra: unknown field",
            "[0].lines[0].qty: value 0 is below minimum 1",
            "[0].lines[1].sku: required field is missing",
            "[0].lines[1].qty: expected integer, found number",
            "[0].lines[2]: expected record, found string",
            "[0].note: unknown field",
            "[1]: expected record, found number",
        ]
    );
}

#[test]
fn test_schema_from_config_file_validates_generically() {
    let config = RunnerConfig::from_toml_str(
        r#"
[[schema.fields]]
name = "tags"
type = "sequence"
items = "string"
pattern = "^[a-z]+$"
"#,
    )
    .unwrap();

    assert!(validate_document(json!({"tags": ["red", "blue"]}), &config.schema).is_ok());

    match validate_document(json!({"tags": ["red", "Blue", 3]}), &config.schema) {
        Err(RunnerError::ValidationError { violations }) => {
            assert_eq!(violations.len(), 2);
            assert_eq!(violations[0].path, "tags[1]");
            assert_eq!(violations[1].path, "tags[2]");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}
