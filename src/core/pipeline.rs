use crate::core::{codec, validator};
use crate::domain::model::{Format, InputDocument, OutputDocument, ValidatedDocument};
use crate::domain::ports::{Pipeline, Sink, Source, Transform};
use crate::domain::schema::Schema;
use crate::utils::error::{Result, RunnerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSettings {
    pub input: Format,
    pub output: Format,
    pub pretty: bool,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            input: Format::Json,
            output: Format::Json,
            pretty: true,
        }
    }
}

/// The load → validate → transform → emit pipeline over one source and
/// one sink.
pub struct DocumentPipeline<S: Source, K: Sink> {
    source: S,
    sink: K,
    formats: FormatSettings,
    schema: Schema,
    steps: Vec<Box<dyn Transform>>,
}

impl<S: Source, K: Sink> DocumentPipeline<S, K> {
    pub fn new(
        source: S,
        sink: K,
        formats: FormatSettings,
        schema: Schema,
        steps: Vec<Box<dyn Transform>>,
    ) -> Self {
        Self {
            source,
            sink,
            formats,
            schema,
            steps,
        }
    }

    pub fn formats(&self) -> FormatSettings {
        self.formats
    }

    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }
}

impl<S: Source, K: Sink> Pipeline for DocumentPipeline<S, K> {
    fn load(&mut self) -> Result<InputDocument> {
        tracing::debug!(
            source = %self.source.describe(),
            format = %self.formats.input,
            "reading input"
        );
        let bytes = self.source.read_all()?;
        tracing::debug!(bytes = bytes.len(), "input read");

        let value = codec::decode(self.formats.input, &bytes)?;
        Ok(InputDocument {
            format: self.formats.input,
            value,
        })
    }

    fn validate(&self, document: InputDocument) -> Result<ValidatedDocument> {
        validator::validate_document(document.value, &self.schema)
    }

    fn transform(&self, document: ValidatedDocument) -> Result<OutputDocument> {
        let shape = document.shape;
        let mut records = Vec::with_capacity(document.records.len());

        for (index, validated) in document.records.into_iter().enumerate() {
            let mut record = validated.into_record();
            for step in &self.steps {
                record = step
                    .apply(record)
                    .map_err(|message| RunnerError::TransformError {
                        step: step.name().to_string(),
                        record: index,
                        message,
                    })?;
            }
            records.push(record);
        }

        Ok(OutputDocument::from_records(shape, records))
    }

    fn emit(&mut self, document: OutputDocument) -> Result<String> {
        let bytes = codec::encode(self.formats.output, &document.value, self.formats.pretty)?;
        let destination = self.sink.describe();

        tracing::debug!(
            destination = %destination,
            bytes = bytes.len(),
            format = %self.formats.output,
            "writing output"
        );
        self.sink.write_all(&bytes)?;
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transforms::{Rename, Scale};
    use crate::domain::model::Record;
    use crate::domain::schema::{FieldKind, FieldSpec};
    use serde_json::json;

    struct MockSource {
        data: Vec<u8>,
    }

    impl Source for MockSource {
        fn describe(&self) -> String {
            "mock input".to_string()
        }

        fn read_all(&mut self) -> Result<Vec<u8>> {
            Ok(self.data.clone())
        }
    }

    #[derive(Default)]
    struct MockSink {
        written: Vec<Vec<u8>>,
    }

    impl Sink for MockSink {
        fn describe(&self) -> String {
            "mock output".to_string()
        }

        fn write_all(&mut self, data: &[u8]) -> Result<()> {
            self.written.push(data.to_vec());
            Ok(())
        }
    }

    struct Failing;

    impl Transform for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn apply(&self, _record: Record) -> std::result::Result<Record, String> {
            Err("unsupported combination".to_string())
        }
    }

    fn pipeline(
        input: &str,
        steps: Vec<Box<dyn Transform>>,
    ) -> DocumentPipeline<MockSource, MockSink> {
        DocumentPipeline::new(
            MockSource {
                data: input.as_bytes().to_vec(),
            },
            MockSink::default(),
            FormatSettings {
                pretty: false,
                ..FormatSettings::default()
            },
            Schema::new().field(FieldSpec::required("value", FieldKind::Number)),
            steps,
        )
    }

    #[test]
    fn test_stages_in_sequence() {
        let mut p = pipeline(
            r#"{"value": 5}"#,
            vec![Box::new(Scale {
                field: "value".to_string(),
                factor: 2.0,
            })],
        );

        let input = p.load().unwrap();
        let validated = p.validate(input).unwrap();
        let output = p.transform(validated).unwrap();
        assert_eq!(output.value, json!({"value": 10}));

        let destination = p.emit(output).unwrap();
        assert_eq!(destination, "mock output");

        let (_, sink) = p.into_parts();
        assert_eq!(sink.written, vec![b"{\"value\":10}\n".to_vec()]);
    }

    #[test]
    fn test_steps_apply_in_order() {
        let p = pipeline(
            r#"{"value": 1}"#,
            vec![
                Box::new(Scale {
                    field: "value".to_string(),
                    factor: 3.0,
                }),
                Box::new(Rename {
                    from: "value".to_string(),
                    to: "total".to_string(),
                }),
            ],
        );
        let validated = validator::validate_document(json!({"value": 1}), &p.schema).unwrap();
        let output = p.transform(validated).unwrap();
        assert_eq!(output.value, json!({"total": 3}));
    }

    #[test]
    fn test_transform_error_names_step_and_record() {
        let p = pipeline("", vec![Box::new(Failing)]);
        let validated =
            validator::validate_document(json!([{"value": 1}, {"value": 2}]), &p.schema).unwrap();

        match p.transform(validated) {
            Err(RunnerError::TransformError { step, record, message }) => {
                assert_eq!(step, "failing");
                assert_eq!(record, 0);
                assert_eq!(message, "unsupported combination");
            }
            other => panic!("expected transform error, got {:?}", other),
        }
    }

    #[test]
    fn test_yaml_in_json_out() {
        let mut p = DocumentPipeline::new(
            MockSource {
                data: b"value: 4\n".to_vec(),
            },
            MockSink::default(),
            FormatSettings {
                input: Format::Yaml,
                output: Format::Json,
                pretty: false,
            },
            Schema::new(),
            Vec::new(),
        );

        let input = p.load().unwrap();
        assert_eq!(input.format, Format::Yaml);
        let output = p.transform(p.validate(input).unwrap()).unwrap();
        p.emit(output).unwrap();

        let (_, sink) = p.into_parts();
        assert_eq!(sink.written[0], b"{\"value\":4}\n".to_vec());
    }
}
