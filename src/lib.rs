pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::{RunOptions, RunnerConfig};
pub use core::{pipeline::DocumentPipeline, runner::TransformRunner};
pub use domain::model::Format;
pub use domain::schema::{FieldKind, FieldSpec, Schema};
pub use utils::error::{ErrorCategory, Result, RunnerError};
