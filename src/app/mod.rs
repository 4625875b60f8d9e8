// Application layer: wires options, config, adapters and the runner into one
// invocation and turns the outcome into an exit status.

use crate::adapters::{FileSink, FileSource, ReaderSource, WriterSink};
use crate::config::{RunOptions, RunnerConfig};
use crate::core::pipeline::{DocumentPipeline, FormatSettings};
use crate::core::runner::{RunReport, TransformRunner};
use crate::core::transforms::build_steps;
use crate::domain::ports::{Sink, Source};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::io::{Read, Write};

/// Runs one invocation against the given standard streams and returns the
/// process exit code. Only the output document is ever written to `stdout`.
pub fn run<'a, R, W>(options: &RunOptions, stdin: R, stdout: W) -> u8
where
    R: Read + 'a,
    W: Write + 'a,
{
    match execute(options, stdin, stdout) {
        Ok(report) => {
            match &report.destination {
                Some(destination) => tracing::info!(
                    records = report.records,
                    destination = %destination,
                    "✅ Transform completed successfully"
                ),
                None => tracing::info!(records = report.records, "✅ Input is valid"),
            }
            0
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                category = %e.category(),
                exit_code = e.exit_code(),
                "❌ Transform failed: {}",
                e.user_friendly_message()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            e.exit_code()
        }
    }
}

fn execute<'a, R, W>(options: &RunOptions, stdin: R, stdout: W) -> Result<RunReport>
where
    R: Read + 'a,
    W: Write + 'a,
{
    options.validate()?;

    let config = match &options.config {
        Some(path) => {
            tracing::info!("📁 Loading runner config from: {}", path.display());
            RunnerConfig::from_file(path)?
        }
        None => RunnerConfig::default(),
    };
    config.validate()?;
    tracing::debug!(
        runner = config.name(),
        fields = config.schema.fields.len(),
        steps = config.transform.steps.len(),
        "runner config ready"
    );

    let formats = FormatSettings {
        input: options.input_format(),
        output: options.output_format(),
        pretty: !options.compact,
    };
    tracing::debug!(input = %formats.input, output = %formats.output, "formats resolved");

    let source: Box<dyn Source + 'a> = match &options.input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(ReaderSource::new("<stdin>", stdin)),
    };
    let sink: Box<dyn Sink + 'a> = match &options.output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(WriterSink::new("<stdout>", stdout)),
    };

    let pipeline = DocumentPipeline::new(
        source,
        sink,
        formats,
        config.schema,
        build_steps(&config.transform.steps),
    );
    let mut runner = TransformRunner::new_with_monitoring(pipeline, options.monitor);

    if options.check {
        runner.check()
    } else {
        runner.run()
    }
}
