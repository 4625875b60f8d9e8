use crate::domain::model::{DocumentShape, Record, ValidatedDocument, ValidatedRecord, Violation};
use crate::domain::schema::{FieldKind, FieldSpec, Schema};
use crate::utils::error::{Result, RunnerError};
use serde_json::{Map, Value};

/// Checks a decoded document against `schema`.
///
/// The root must be a record or a sequence of records. Every violation is
/// collected before returning, so one failed run reports the full picture.
pub fn validate_document(value: Value, schema: &Schema) -> Result<ValidatedDocument> {
    let mut violations = Vec::new();

    let (shape, records) = match value {
        Value::Object(map) => {
            check_record(
                &map,
                &schema.fields,
                schema.allow_unknown,
                "",
                &mut violations,
            );
            (DocumentShape::Single, vec![map])
        }
        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                let path = format!("[{}]", index);
                match item {
                    Value::Object(map) => {
                        check_record(
                            &map,
                            &schema.fields,
                            schema.allow_unknown,
                            &path,
                            &mut violations,
                        );
                        records.push(map);
                    }
                    other => violations.push(Violation::new(
                        path,
                        format!("expected record, found {}", type_name(&other)),
                    )),
                }
            }
            (DocumentShape::Sequence, records)
        }
        other => {
            violations.push(Violation::new(
                "$",
                format!(
                    "expected a record or a sequence of records, found {}",
                    type_name(&other)
                ),
            ));
            (DocumentShape::Single, Vec::new())
        }
    };

    if !violations.is_empty() {
        return Err(RunnerError::ValidationError { violations });
    }

    Ok(ValidatedDocument {
        shape,
        records: records
            .into_iter()
            .map(|data| ValidatedRecord::new(Record::new(data)))
            .collect(),
    })
}

fn check_record(
    map: &Map<String, Value>,
    fields: &[FieldSpec],
    allow_unknown: bool,
    prefix: &str,
    out: &mut Vec<Violation>,
) {
    for spec in fields {
        let path = join_field(prefix, &spec.name);
        match map.get(&spec.name) {
            None if spec.required => out.push(Violation::new(path, "required field is missing")),
            Some(Value::Null) if spec.required => {
                out.push(Violation::new(path, "required field is null"))
            }
            None | Some(Value::Null) => {}
            Some(value) => check_value(value, spec.kind, spec, allow_unknown, &path, out),
        }
    }

    if !allow_unknown {
        for key in map.keys() {
            if !fields.iter().any(|spec| &spec.name == key) {
                out.push(Violation::new(join_field(prefix, key), "unknown field"));
            }
        }
    }
}

/// `kind` is passed separately so sequence elements can be checked against
/// `spec.items` while sharing the rest of the field declaration.
fn check_value(
    value: &Value,
    kind: FieldKind,
    spec: &FieldSpec,
    allow_unknown: bool,
    path: &str,
    out: &mut Vec<Violation>,
) {
    if !kind_matches(kind, value) {
        out.push(Violation::new(
            path,
            format!("expected {}, found {}", kind, type_name(value)),
        ));
        return;
    }

    match (kind, value) {
        (FieldKind::String, Value::String(text)) => {
            if let Some(pattern) = &spec.pattern {
                if !pattern.is_match(text) {
                    out.push(Violation::new(
                        path,
                        format!("value does not match pattern '{}'", pattern.as_str()),
                    ));
                }
            }
        }
        (FieldKind::Number | FieldKind::Integer, Value::Number(number)) => {
            if let Some(n) = number.as_f64() {
                check_bounds(n, spec, path, out);
            }
        }
        (FieldKind::Record, Value::Object(map)) => {
            check_record(map, &spec.fields, allow_unknown, path, out);
        }
        (FieldKind::Sequence, Value::Array(items)) => {
            // Nested sequences are only type-checked one level down.
            if let Some(item_kind) = spec.items.filter(|k| *k != FieldKind::Sequence) {
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, index);
                    check_value(item, item_kind, spec, allow_unknown, &item_path, out);
                }
            } else if spec.items == Some(FieldKind::Sequence) {
                for (index, item) in items.iter().enumerate() {
                    if !item.is_array() {
                        out.push(Violation::new(
                            format!("{}[{}]", path, index),
                            format!("expected sequence, found {}", type_name(item)),
                        ));
                    }
                }
            }
        }
        _ => {}
    }
}

fn check_bounds(n: f64, spec: &FieldSpec, path: &str, out: &mut Vec<Violation>) {
    if let Some(min) = spec.min {
        if n < min {
            out.push(Violation::new(
                path,
                format!("value {} is below minimum {}", n, min),
            ));
        }
    }
    if let Some(max) = spec.max {
        if n > max {
            out.push(Violation::new(
                path,
                format!("value {} is above maximum {}", n, max),
            ));
        }
    }
}

fn kind_matches(kind: FieldKind, value: &Value) -> bool {
    match kind {
        FieldKind::String => value.is_string(),
        FieldKind::Number => value.is_number(),
        FieldKind::Integer => match value {
            Value::Number(n) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            _ => false,
        },
        FieldKind::Boolean => value.is_boolean(),
        FieldKind::Record => value.is_object(),
        FieldKind::Sequence => value.is_array(),
        FieldKind::Any => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "record",
    }
}

fn join_field(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
