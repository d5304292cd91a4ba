//! Machine-readable formatter
//!
//! Buffers every file report and emits the whole run as one JSON document at
//! finalize time.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::BentoError;
use crate::formatter::Formatter;
use crate::notice::FileReport;
use crate::result::Result;
use crate::severity::Severity;

#[derive(Serialize)]
struct FileEntry {
    file: PathBuf,
    #[serde(flatten)]
    report: FileReport,
}

#[derive(Serialize)]
struct RunDocument<'a> {
    files: &'a [FileEntry],
    severity: Option<Severity>,
}

/// Formatter emitting the aggregated run as a single JSON document.
pub struct JsonFormatter {
    writer: Box<dyn Write + Send>,
    entries: Vec<FileEntry>,
}

impl JsonFormatter {
    /// Create a formatter writing to an arbitrary writer.
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer,
            entries: Vec::new(),
        }
    }

    /// Create a formatter writing to stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}

#[async_trait]
impl Formatter for JsonFormatter {
    async fn notify(&mut self, file: &Path, report: &FileReport) -> Result<()> {
        self.entries.push(FileEntry {
            file: file.to_path_buf(),
            report: report.clone(),
        });
        Ok(())
    }

    async fn finalize(&mut self, overall: Option<Severity>) -> Result<()> {
        let document = RunDocument {
            files: &self.entries,
            severity: overall,
        };
        serde_json::to_writer_pretty(&mut self.writer, &document)
            .map_err(|e| BentoError::formatter(e.to_string()))?;
        writeln!(self.writer).map_err(|e| BentoError::formatter(e.to_string()))?;
        self.writer
            .flush()
            .map_err(|e| BentoError::formatter(e.to_string()))
    }
}
