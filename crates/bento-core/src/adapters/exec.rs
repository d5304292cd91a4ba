//! External-command adapter
//!
//! Bridges any third-party tool that can report findings as one JSON object
//! per stdout line. The command is invoked once per file with the file path
//! appended to the configured arguments.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::adapter::{Adapter, AdapterContext};
use crate::error::BentoError;
use crate::notice::{Location, Notice};
use crate::result::Result;
use crate::severity::Severity;

/// Options document accepted by [`ExecAdapter`].
#[derive(Debug, Deserialize)]
struct ExecOptions {
    /// Program to run
    command: String,
    /// Arguments placed before the file path
    #[serde(default)]
    args: Vec<String>,
    /// Extra arguments appended when the fix flag is set
    #[serde(default, rename = "fixArgs")]
    fix_args: Vec<String>,
}

/// One finding as emitted by the external tool, one JSON object per line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecFinding {
    line: u32,
    column: Option<u32>,
    end_line: Option<u32>,
    end_column: Option<u32>,
    severity: Option<Value>,
    message: String,
    rule: Option<String>,
}

/// Built-in adapter spawning a configured external command per file.
#[derive(Debug, Default)]
pub struct ExecAdapter;

impl ExecAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Adapter for ExecAdapter {
    fn name(&self) -> &str {
        "exec"
    }

    async fn lint(&self, file: &Path, ctx: &AdapterContext) -> Result<Vec<Notice>> {
        let options: ExecOptions = serde_json::from_value(ctx.options.clone())
            .map_err(|e| BentoError::adapter("exec", format!("invalid options: {e}")))?;

        let mut command = tokio::process::Command::new(&options.command);
        command
            .args(&options.args)
            .current_dir(&ctx.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if ctx.fix {
            command.args(&options.fix_args);
        }
        command.arg(file);

        debug!(command = %options.command, file = %file.display(), "spawning external linter");

        let output = command.output().await.map_err(|e| {
            BentoError::adapter("exec", format!("failed to spawn '{}': {e}", options.command))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut notices = Vec::new();
        let mut parse_failures = 0usize;
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str::<ExecFinding>(line) {
                Ok(finding) => notices.push(finding_to_notice(finding, file)),
                Err(_) => parse_failures += 1,
            }
        }

        // Many linters exit non-zero when they find problems; only treat the
        // status as a failure when nothing usable came back.
        if notices.is_empty() && parse_failures == 0 && !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BentoError::adapter(
                "exec",
                format!(
                    "'{}' exited with {}: {}",
                    options.command,
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        Ok(notices)
    }
}

fn finding_to_notice(finding: ExecFinding, file: &Path) -> Notice {
    let severity = finding
        .severity
        .as_ref()
        .and_then(parse_severity)
        .unwrap_or(Severity::Error);

    let location = Location {
        line: finding.line,
        column: finding.column,
        end_line: finding.end_line,
        end_column: finding.end_column,
    };

    let mut notice =
        Notice::new(file, "exec", severity, finding.message).with_location(location);
    if let Some(rule) = finding.rule {
        notice = notice.with_rule(rule);
    }
    notice
}

fn parse_severity(value: &Value) -> Option<Severity> {
    match value {
        Value::String(name) => Severity::from_name(name),
        Value::Number(number) => number.as_i64().and_then(Severity::from_value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn ctx(options: Value) -> AdapterContext {
        AdapterContext {
            level: Severity::Info,
            fix: false,
            root: PathBuf::from("."),
            files: Arc::new(Vec::new()),
            options,
        }
    }

    #[tokio::test]
    async fn parses_json_lines_into_notices() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.js");
        std::fs::write(&file, "x").unwrap();

        // `printf` plays the external tool: the %s format repeats per
        // argument, so the finding and the appended file path each print on
        // their own line; the non-JSON path line is ignored.
        let finding = r#"{"line":3,"column":7,"severity":"warn","message":"spawned finding"}"#;
        let options = json!({ "command": "printf", "args": ["%s\n", finding] });

        let notices = ExecAdapter::new().lint(&file, &ctx(options)).await.unwrap();

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Warn);
        assert_eq!(notices[0].message, "spawned finding");
        assert_eq!(notices[0].locations[0].line, 3);
    }

    #[tokio::test]
    async fn missing_command_is_an_adapter_error() {
        let err = ExecAdapter::new()
            .lint(Path::new("a.js"), &ctx(json!({})))
            .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn unspawnable_command_is_an_adapter_error() {
        let options = json!({ "command": "definitely-not-a-real-binary-9f2c" });
        let err = ExecAdapter::new().lint(Path::new("a.js"), &ctx(options)).await;
        assert!(err.is_err());
    }

    #[test]
    fn severity_accepts_names_and_numbers() {
        assert_eq!(parse_severity(&json!("fatal")), Some(Severity::Fatal));
        assert_eq!(parse_severity(&json!(3)), Some(Severity::Warn));
        assert_eq!(parse_severity(&json!(true)), None);
    }
}
