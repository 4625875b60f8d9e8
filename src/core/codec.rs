use crate::domain::model::Format;
use crate::utils::error::{Result, RunnerError};
use serde_json::{Map, Number, Value};

/// Decodes raw bytes into an untyped document.
pub fn decode(format: Format, bytes: &[u8]) -> Result<Value> {
    match format {
        Format::Json => serde_json::from_slice(bytes).map_err(|e| RunnerError::ParseError {
            format,
            message: e.to_string(),
        }),
        Format::Yaml => {
            let parsed: serde_yaml::Value =
                serde_yaml::from_slice(bytes).map_err(|e| RunnerError::ParseError {
                    format,
                    message: e.to_string(),
                })?;
            yaml_to_json(parsed, "$")
                .map_err(|message| RunnerError::ParseError { format, message })
        }
    }
}

/// Converts a YAML tree without losing values. `.inf`/`.nan` and custom
/// tags have no JSON counterpart and are rejected. Scalar keys become strings.
fn yaml_to_json(value: serde_yaml::Value, path: &str) -> std::result::Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                let number = Number::from_f64(f).ok_or_else(|| {
                    format!("{}: non-finite number {} cannot be represented", path, n)
                })?;
                Value::Number(number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| yaml_to_json(item, &format!("{}[{}]", path, index)))
                .collect::<std::result::Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, item) in mapping {
                let key = match key {
                    Yaml::String(s) => s,
                    Yaml::Bool(b) => b.to_string(),
                    Yaml::Number(n) => n.to_string(),
                    _ => return Err(format!("{}: mapping keys must be scalars", path)),
                };
                let child = if path == "$" {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                let converted = yaml_to_json(item, &child)?;
                if map.insert(key, converted).is_some() {
                    return Err(format!("{}: duplicate key", child));
                }
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => {
            return Err(format!("{}: unsupported tag {}", path, tagged.tag));
        }
    })
}

/// Serializes the whole document up front. Nothing is written anywhere
/// until this has succeeded.
pub fn encode(format: Format, value: &Value, pretty: bool) -> Result<Vec<u8>> {
    let serialization_error = |message: String| RunnerError::SerializationError { format, message };

    match format {
        Format::Json => {
            let encoded = if pretty {
                serde_json::to_vec_pretty(value)
            } else {
                serde_json::to_vec(value)
            };
            let mut bytes = encoded.map_err(|e| serialization_error(e.to_string()))?;
            bytes.push(b'\n');
            Ok(bytes)
        }
        Format::Yaml => serde_yaml::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| serialization_error(e.to_string())),
    }
}
