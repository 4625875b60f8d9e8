use std::fmt;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable that selects the log level.
pub const LOG_LEVEL_ENV: &str = "TRANSFORM_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Accepts `DEBUG|INFO|WARNING|ERROR` in any case, plus `WARN`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARNING" | "WARN" => Some(LogLevel::Warning),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }

    fn directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl LogConfig {
    /// Builds the sink settings from the raw environment value.
    ///
    /// `verbose` forces DEBUG. An unrecognized level falls back to INFO and is
    /// handed back so the caller can report it once logging is up.
    pub fn resolve(
        raw_level: Option<&str>,
        format: LogFormat,
        verbose: bool,
    ) -> (Self, Option<String>) {
        let mut rejected = None;
        let mut level = match raw_level {
            None => LogLevel::default(),
            Some(raw) => LogLevel::parse(raw).unwrap_or_else(|| {
                rejected = Some(raw.to_string());
                LogLevel::default()
            }),
        };

        if verbose {
            level = LogLevel::Debug;
        }

        (Self { level, format }, rejected)
    }
}

/// Installs the global subscriber. Log records always go to stderr so that
/// stdout carries nothing but the output document.
pub fn init_cli_logger(config: &LogConfig) {
    let filter = EnvFilter::new(config.level.directive());
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init(),
    }
}
