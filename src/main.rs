use clap::Parser;
use std::process::ExitCode;
use transform_runner::utils::error::ErrorCategory;
use transform_runner::utils::logger::{self, LogConfig, LogFormat, LOG_LEVEL_ENV};
use transform_runner::utils::validation::Validate;
use transform_runner::CliConfig;

/// Resolves the level from the environment once and installs the logger.
fn init_logging(format: LogFormat, verbose: bool) {
    let raw_level = std::env::var(LOG_LEVEL_ENV).ok();
    let (log_config, rejected_level) = LogConfig::resolve(raw_level.as_deref(), format, verbose);
    logger::init_cli_logger(&log_config);

    if let Some(raw) = rejected_level {
        tracing::warn!(
            "Unrecognized {} value '{}', falling back to {}",
            LOG_LEVEL_ENV,
            raw,
            log_config.level
        );
    }
}

fn main() -> ExitCode {
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(e) if e.use_stderr() => {
            // 參數解析失敗時還不知道 --log-format，用預設格式記錄
            init_logging(LogFormat::default(), false);
            let code = ErrorCategory::Config.exit_code();
            let rendered = e.render().to_string();
            tracing::error!(
                category = %ErrorCategory::Config,
                exit_code = code,
                "❌ Invalid command line: {}",
                rendered.trim_end()
            );
            tracing::error!("💡 Suggestion: Run with --help to see the accepted arguments");
            return ExitCode::from(code);
        }
        Err(e) => {
            // --help / --version 走 stdout 且視為成功
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    init_logging(config.log_format, config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!(category = %e.category(), "❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        return ExitCode::from(e.exit_code());
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    ExitCode::from(transform_runner::app::run(&config.options(), stdin, stdout))
}
