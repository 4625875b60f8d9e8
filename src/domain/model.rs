use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Wire format of a structured document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Infers the format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    /// Explicit choice wins, then the path extension, then `fallback`.
    pub fn resolve(explicit: Option<Format>, path: Option<&Path>, fallback: Format) -> Self {
        explicit
            .or_else(|| path.and_then(Format::from_path))
            .unwrap_or(fallback)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

/// Decoded input, before any schema check.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDocument {
    pub format: Format,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    Single,
    Sequence,
}

/// A record that passed schema validation.
///
/// Only the validator constructs these, so holding one means every required
/// field was present and type-correct.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord(Record);

impl ValidatedRecord {
    pub(crate) fn new(record: Record) -> Self {
        Self(record)
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.0.data
    }

    pub fn into_record(self) -> Record {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDocument {
    pub shape: DocumentShape,
    pub records: Vec<ValidatedRecord>,
}

impl ValidatedDocument {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputDocument {
    pub value: Value,
    pub records: usize,
}

impl OutputDocument {
    /// Rebuilds the document in the shape the input arrived in.
    pub fn from_records(shape: DocumentShape, records: Vec<Record>) -> Self {
        let count = records.len();
        let value = match shape {
            DocumentShape::Single => records
                .into_iter()
                .next()
                .map(|record| Value::Object(record.data))
                .unwrap_or(Value::Object(Map::new())),
            DocumentShape::Sequence => Value::Array(
                records
                    .into_iter()
                    .map(|record| Value::Object(record.data))
                    .collect(),
            ),
        };

        Self {
            value,
            records: count,
        }
    }
}

/// One schema violation: where it happened and what was wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub reason: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}
