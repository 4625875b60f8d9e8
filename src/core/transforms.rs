use crate::domain::model::Record;
use crate::domain::ports::Transform;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// Declarative form of a transform step, as written in the runner config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformSpec {
    Identity,
    Scale { field: String, factor: f64 },
    Rename { from: String, to: String },
    Drop { fields: Vec<String> },
    Keep { fields: Vec<String> },
}

impl TransformSpec {
    pub fn build(&self) -> Box<dyn Transform> {
        match self {
            TransformSpec::Identity => Box::new(Identity),
            TransformSpec::Scale { field, factor } => Box::new(Scale {
                field: field.clone(),
                factor: *factor,
            }),
            TransformSpec::Rename { from, to } => Box::new(Rename {
                from: from.clone(),
                to: to.clone(),
            }),
            TransformSpec::Drop { fields } => Box::new(DropFields {
                fields: fields.clone(),
            }),
            TransformSpec::Keep { fields } => Box::new(KeepFields {
                fields: fields.clone(),
            }),
        }
    }
}

pub fn build_steps(specs: &[TransformSpec]) -> Vec<Box<dyn Transform>> {
    specs.iter().map(TransformSpec::build).collect()
}

pub struct Identity;

impl Transform for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn apply(&self, record: Record) -> Result<Record, String> {
        Ok(record)
    }
}

/// Multiplies a numeric field. Dotted paths reach into nested records.
pub struct Scale {
    pub field: String,
    pub factor: f64,
}

/// Magnitude bound for factors handled as exact integers (2^64).
const EXACT_FACTOR_LIMIT: f64 = 18_446_744_073_709_551_616.0;

impl Scale {
    fn scale(&self, number: &Number) -> Result<Number, String> {
        // 整數乘以整數倍率時保持整數
        let integer = number
            .as_i64()
            .map(i128::from)
            .or_else(|| number.as_u64().map(i128::from));
        if let (Some(n), true) = (integer, self.factor.fract() == 0.0) {
            return self.scale_integer(n);
        }

        let n = number
            .as_f64()
            .ok_or_else(|| format!("field '{}': {} is not representable", self.field, number))?;
        Number::from_f64(n * self.factor).ok_or_else(|| {
            format!(
                "field '{}': {} * {} is not a finite number",
                self.field, n, self.factor
            )
        })
    }

    /// Multiplies in i128 and keeps the result only if it fits i64 or u64.
    fn scale_integer(&self, n: i128) -> Result<Number, String> {
        let overflow = || {
            format!(
                "field '{}': {} * {} overflows a 64-bit integer",
                self.field, n, self.factor
            )
        };

        let product = if self.factor.abs() < EXACT_FACTOR_LIMIT {
            n.checked_mul(self.factor as i128).ok_or_else(overflow)?
        } else if n == 0 {
            0
        } else {
            return Err(overflow());
        };

        if let Ok(v) = i64::try_from(product) {
            Ok(Number::from(v))
        } else if let Ok(v) = u64::try_from(product) {
            Ok(Number::from(v))
        } else {
            Err(overflow())
        }
    }
}

impl Transform for Scale {
    fn name(&self) -> &str {
        "scale"
    }

    fn apply(&self, mut record: Record) -> Result<Record, String> {
        match lookup_mut(&mut record.data, &self.field) {
            None | Some(Value::Null) => {}
            Some(Value::Number(number)) => {
                let scaled = self.scale(number)?;
                *number = scaled;
            }
            Some(other) => {
                return Err(format!(
                    "field '{}' is not numeric (found {})",
                    self.field,
                    describe(other)
                ));
            }
        }
        Ok(record)
    }
}

pub struct Rename {
    pub from: String,
    pub to: String,
}

impl Transform for Rename {
    fn name(&self) -> &str {
        "rename"
    }

    fn apply(&self, mut record: Record) -> Result<Record, String> {
        if !record.data.contains_key(&self.from) {
            return Ok(record);
        }
        if record.data.contains_key(&self.to) {
            return Err(format!(
                "cannot rename '{}' to '{}': target field already exists",
                self.from, self.to
            ));
        }
        if let Some(value) = record.data.remove(&self.from) {
            record.data.insert(self.to.clone(), value);
        }
        Ok(record)
    }
}

pub struct DropFields {
    pub fields: Vec<String>,
}

impl Transform for DropFields {
    fn name(&self) -> &str {
        "drop"
    }

    fn apply(&self, mut record: Record) -> Result<Record, String> {
        for field in &self.fields {
            record.data.remove(field);
        }
        Ok(record)
    }
}

pub struct KeepFields {
    pub fields: Vec<String>,
}

impl Transform for KeepFields {
    fn name(&self) -> &str {
        "keep"
    }

    fn apply(&self, mut record: Record) -> Result<Record, String> {
        record.data.retain(|key, _| self.fields.iter().any(|f| f == key));
        Ok(record)
    }
}

fn lookup_mut<'a>(data: &'a mut Map<String, Value>, path: &str) -> Option<&'a mut Value> {
    let mut segments = path.split('.');
    let mut current = data.get_mut(segments.next()?)?;
    for segment in segments {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "record",
    }
}
