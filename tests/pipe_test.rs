use serde_json::{json, Value};
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use transform_runner::app;
use transform_runner::RunOptions;

/// Collects everything the log subscriber writes.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn run_logged(options: &RunOptions, input: &[u8], logs: &CapturedLogs) -> (u8, Vec<u8>) {
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let mut stdout = Vec::new();
    let code = tracing::subscriber::with_default(subscriber, || {
        app::run(options, Cursor::new(input.to_vec()), &mut stdout)
    });
    (code, stdout)
}

fn idempotent_options(temp_dir: &TempDir) -> RunOptions {
    let config_path = temp_dir.path().join("cleanup.toml");
    std::fs::write(
        &config_path,
        r#"
[runner]
name = "cleanup"

[[schema.fields]]
name = "id"
type = "integer"

[[schema.fields]]
name = "password"
type = "string"
required = false

[[transform.steps]]
kind = "drop"
fields = ["password"]

[[transform.steps]]
kind = "rename"
from = "mail"
to = "email"
"#,
    )
    .unwrap();

    RunOptions {
        config: Some(config_path),
        ..RunOptions::default()
    }
}

#[test]
fn test_piped_runs_are_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let options = idempotent_options(&temp_dir);
    let logs = CapturedLogs::default();

    let input = br#"[{"id": 1, "mail": "a@example.com", "password": "x"}, {"id": 2}]"#;
    let (code, first) = run_logged(&options, input, &logs);
    assert_eq!(code, 0);

    // 第一次的 stdout 直接當作第二次的 stdin
    let (code, second) = run_logged(&options, &first, &logs);
    assert_eq!(code, 0);
    assert_eq!(first, second);

    let output: Value = serde_json::from_slice(&second).unwrap();
    assert_eq!(output, json!([{"id": 1, "email": "a@example.com"}, {"id": 2}]));
}

#[test]
fn test_logs_never_reach_stdout() {
    let logs = CapturedLogs::default();
    let (code, stdout) = run_logged(&RunOptions::default(), br#"{"value": 5}"#, &logs);

    assert_eq!(code, 0);
    let captured = logs.contents();
    assert!(captured.contains("stage started"));
    assert!(captured.contains("stage succeeded"));

    let text = String::from_utf8(stdout).unwrap();
    assert!(!text.contains("stage"));
    assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), json!({"value": 10}));
}

#[test]
fn test_failures_are_logged_at_error_level() {
    let logs = CapturedLogs::default();
    let (code, stdout) = run_logged(&RunOptions::default(), br#"{"value": "ten", "x": 1}"#, &logs);

    assert_eq!(code, 2);
    assert!(stdout.is_empty());

    let captured = logs.contents();
    assert!(captured.contains("ERROR"));
    assert!(captured.contains("category=validation"));
    assert!(captured.contains("expected number, found string"));
}
