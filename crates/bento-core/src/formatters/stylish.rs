//! Human-readable formatter
//!
//! Prints one block per file with findings, one line per notice, and a
//! run-end summary. Colors are enabled when writing to a terminal.

use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use is_terminal::IsTerminal;

use crate::error::BentoError;
use crate::formatter::Formatter;
use crate::notice::{FileReport, Notice};
use crate::result::Result;
use crate::severity::Severity;

/// The default human-oriented formatter.
pub struct StylishFormatter {
    writer: Box<dyn Write + Send>,
    colors: bool,
    counts: [usize; 5],
    files_with_findings: usize,
}

impl StylishFormatter {
    /// Create a formatter writing to an arbitrary writer.
    pub fn new(writer: Box<dyn Write + Send>, colors: bool) -> Self {
        Self {
            writer,
            colors,
            counts: [0; 5],
            files_with_findings: 0,
        }
    }

    /// Create a formatter writing to stdout, with colors when attached to a
    /// terminal.
    pub fn stdout() -> Self {
        let colors = std::io::stdout().is_terminal();
        Self::new(Box::new(std::io::stdout()), colors)
    }

    fn colorize(&self, text: &str, code: &str) -> String {
        if self.colors {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn severity_label(&self, severity: Severity) -> String {
        let code = match severity {
            Severity::Fatal | Severity::Error => "31",
            Severity::Warn => "33",
            _ => "34",
        };
        self.colorize(severity.name(), code)
    }

    fn write_notice(&mut self, notice: &Notice) -> std::io::Result<()> {
        let position = match notice.locations.first() {
            Some(location) => match location.column {
                Some(column) => format!("{}:{}", location.line, column),
                None => format!("{}", location.line),
            },
            None => String::from("-"),
        };

        let label = self.severity_label(notice.severity);
        let origin = match &notice.rule {
            Some(rule) => format!("{} ({rule})", notice.linter),
            None => notice.linter.clone(),
        };

        writeln!(
            self.writer,
            "  {position:>9}  {label:<7}  {}  {}",
            notice.message, origin
        )
    }
}

#[async_trait]
impl Formatter for StylishFormatter {
    async fn notify(&mut self, file: &Path, report: &FileReport) -> Result<()> {
        let notices = match report {
            FileReport::NotAnalyzed => return Ok(()),
            FileReport::Analyzed(notices) if notices.is_empty() => return Ok(()),
            FileReport::Analyzed(notices) => notices,
        };

        self.files_with_findings += 1;
        let header = self.colorize(&file.display().to_string(), "4");
        writeln!(self.writer, "\n{header}").map_err(|e| BentoError::formatter(e.to_string()))?;

        for notice in notices {
            self.counts[notice.severity as usize] += 1;
            self.write_notice(notice)
                .map_err(|e| BentoError::formatter(e.to_string()))?;
        }
        Ok(())
    }

    async fn finalize(&mut self, overall: Option<Severity>) -> Result<()> {
        let total: usize = self.counts.iter().sum();
        let line = if total == 0 {
            self.colorize("\nNo problems found", "32")
        } else {
            let mut parts = Vec::new();
            for severity in [
                Severity::Fatal,
                Severity::Error,
                Severity::Warn,
                Severity::Info,
            ] {
                let count = self.counts[severity as usize];
                if count > 0 {
                    parts.push(format!("{count} {}", severity.name()));
                }
            }
            let summary = format!(
                "\n\u{2716} {total} problem{} in {} file{} ({})",
                if total == 1 { "" } else { "s" },
                self.files_with_findings,
                if self.files_with_findings == 1 { "" } else { "s" },
                parts.join(", ")
            );
            let code = match overall {
                Some(Severity::Fatal) | Some(Severity::Error) => "31",
                Some(Severity::Warn) => "33",
                _ => "34",
            };
            self.colorize(&summary, code)
        };

        writeln!(self.writer, "{line}").map_err(|e| BentoError::formatter(e.to_string()))?;
        self.writer
            .flush()
            .map_err(|e| BentoError::formatter(e.to_string()))
    }
}
