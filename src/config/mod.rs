#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::Format;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use std::path::PathBuf;

pub use toml_config::RunnerConfig;

/// Everything a single run needs, independent of how it was parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<Format>,
    pub output_format: Option<Format>,
    pub config: Option<PathBuf>,
    pub compact: bool,
    pub check: bool,
    pub monitor: bool,
}

impl RunOptions {
    /// Input format: explicit flag, then `--input` extension, then JSON.
    pub fn input_format(&self) -> Format {
        Format::resolve(self.format, self.input.as_deref(), Format::Json)
    }

    /// Output format: explicit flag, then `--output` extension, then the
    /// input format.
    pub fn output_format(&self) -> Format {
        Format::resolve(
            self.output_format,
            self.output.as_deref(),
            self.input_format(),
        )
    }
}

impl Validate for RunOptions {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            validate_path("input", input)?;
        }
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdin_defaults_to_json() {
        let options = RunOptions::default();
        assert_eq!(options.input_format(), Format::Json);
        assert_eq!(options.output_format(), Format::Json);
    }

    #[test]
    fn test_formats_follow_extensions() {
        let options = RunOptions {
            input: Some(PathBuf::from("in.yml")),
            ..RunOptions::default()
        };
        assert_eq!(options.input_format(), Format::Yaml);
        assert_eq!(options.output_format(), Format::Yaml);

        let options = RunOptions {
            input: Some(PathBuf::from("in.yaml")),
            output: Some(PathBuf::from("out.json")),
            ..RunOptions::default()
        };
        assert_eq!(options.output_format(), Format::Json);
    }

    #[test]
    fn test_explicit_formats_win() {
        let options = RunOptions {
            input: Some(PathBuf::from("in.json")),
            format: Some(Format::Yaml),
            output: Some(PathBuf::from("out.yaml")),
            output_format: Some(Format::Json),
            ..RunOptions::default()
        };
        assert_eq!(options.input_format(), Format::Yaml);
        assert_eq!(options.output_format(), Format::Json);
    }

    #[test]
    fn test_empty_paths_are_rejected() {
        let options = RunOptions {
            output: Some(PathBuf::new()),
            ..RunOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
