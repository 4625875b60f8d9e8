use crate::domain::ports::Pipeline;
use crate::utils::error::{Result, RunnerError};
use crate::utils::monitor::SystemMonitor;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Validate,
    Transform,
    Emit,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::Validate => "validate",
            Stage::Transform => "transform",
            Stage::Emit => "emit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub records: usize,
    /// `None` when the run stopped after validation.
    pub destination: Option<String>,
}

/// Drives a pipeline through its stages, one at a time, stopping at the
/// first failure.
pub struct TransformRunner<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> TransformRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, enable_monitoring: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(enable_monitoring),
        }
    }

    pub fn into_pipeline(self) -> P {
        self.pipeline
    }

    pub fn run(&mut self) -> Result<RunReport> {
        tracing::info!("Starting transform run");
        self.monitor.log_stats("start");

        started(Stage::Load);
        let input = self.pipeline.load().inspect_err(|e| failed(Stage::Load, e))?;
        tracing::info!(stage = %Stage::Load, format = %input.format, "stage succeeded");
        self.monitor.log_stats(Stage::Load.as_str());

        started(Stage::Validate);
        let validated = self
            .pipeline
            .validate(input)
            .inspect_err(|e| failed(Stage::Validate, e))?;
        tracing::info!(stage = %Stage::Validate, records = validated.len(), "stage succeeded");
        self.monitor.log_stats(Stage::Validate.as_str());

        started(Stage::Transform);
        let output = self
            .pipeline
            .transform(validated)
            .inspect_err(|e| failed(Stage::Transform, e))?;
        let records = output.records;
        tracing::info!(stage = %Stage::Transform, records, "stage succeeded");
        self.monitor.log_stats(Stage::Transform.as_str());

        started(Stage::Emit);
        let destination = self
            .pipeline
            .emit(output)
            .inspect_err(|e| failed(Stage::Emit, e))?;
        tracing::info!(stage = %Stage::Emit, destination = %destination, "stage succeeded");
        self.monitor.log_stats(Stage::Emit.as_str());

        self.monitor.log_final_stats();
        Ok(RunReport {
            records,
            destination: Some(destination),
        })
    }

    /// Loads and validates only. Nothing reaches the sink.
    pub fn check(&mut self) -> Result<RunReport> {
        tracing::info!("Starting check run");

        started(Stage::Load);
        let input = self.pipeline.load().inspect_err(|e| failed(Stage::Load, e))?;
        tracing::info!(stage = %Stage::Load, format = %input.format, "stage succeeded");
        self.monitor.log_stats(Stage::Load.as_str());

        started(Stage::Validate);
        let validated = self
            .pipeline
            .validate(input)
            .inspect_err(|e| failed(Stage::Validate, e))?;
        tracing::info!(stage = %Stage::Validate, records = validated.len(), "stage succeeded");
        self.monitor.log_stats(Stage::Validate.as_str());

        self.monitor.log_final_stats();
        Ok(RunReport {
            records: validated.len(),
            destination: None,
        })
    }
}

fn started(stage: Stage) {
    tracing::info!(stage = %stage, "stage started");
}

fn failed(stage: Stage, error: &RunnerError) {
    tracing::error!(
        stage = %stage,
        category = %error.category(),
        exit_code = error.exit_code(),
        "stage failed: {}",
        error
    );
    for violation in error.violations() {
        tracing::error!(
            stage = %stage,
            path = %violation.path,
            reason = %violation.reason,
            "validation violation"
        );
    }
}
