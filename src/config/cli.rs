use crate::config::RunOptions;
use crate::domain::model::Format;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "transform-runner")]
#[command(version)]
#[command(about = "Validate and transform a JSON or YAML document")]
pub struct CliConfig {
    /// Input file (reads stdin if not provided)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output file (writes stdout if not provided)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Input format; inferred from the --input extension, else json
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Output format; inferred from the --output extension, else the input format
    #[arg(long, value_enum)]
    pub output_format: Option<Format>,

    /// TOML file declaring the schema and transform steps
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Load and validate only; write no output
    #[arg(long)]
    pub check: bool,

    /// Log memory and CPU usage after each stage
    #[arg(long)]
    pub monitor: bool,

    /// Enable debug logging regardless of TRANSFORM_LOG_LEVEL
    #[arg(short, long)]
    pub verbose: bool,

    /// Layout of log records on stderr
    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

impl CliConfig {
    pub fn options(&self) -> RunOptions {
        RunOptions {
            input: self.input.clone(),
            output: self.output.clone(),
            format: self.format,
            output_format: self.output_format,
            config: self.config.clone(),
            compact: self.compact,
            check: self.check,
            monitor: self.monitor,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.options().validate()
    }
}
