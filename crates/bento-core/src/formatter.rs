//! Formatter contract and registry
//!
//! Formatters render the aggregated result stream. The orchestrator calls
//! `notify` once per file in original input order, then `finalize` once with
//! the run-wide severity.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use crate::notice::FileReport;
use crate::result::Result;
use crate::severity::Severity;

/// Contract every output formatter implements.
#[async_trait]
pub trait Formatter: Send {
    /// Deliver one file's report. Called in input order.
    async fn notify(&mut self, file: &Path, report: &FileReport) -> Result<()>;

    /// Finish the run. `overall` is `None` when no notices exist at all.
    async fn finalize(&mut self, overall: Option<Severity>) -> Result<()>;
}

/// Factory producing a fresh formatter instance.
///
/// Formatters are stateful (they own their output writer), so the registry
/// stores constructors rather than shared instances.
pub type FormatterFactory = Box<dyn Fn() -> Box<dyn Formatter> + Send + Sync>;

/// Closed name → formatter-factory table, validated at normalization time.
#[derive(Default)]
pub struct FormatterRegistry {
    factories: BTreeMap<String, FormatterFactory>,
}

impl FormatterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in formatters, both
    /// writing to stdout.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("stylish", || {
            Box::new(crate::formatters::StylishFormatter::stdout())
        });
        registry.register("json", || {
            Box::new(crate::formatters::JsonFormatter::stdout())
        });
        registry
    }

    /// Register a formatter factory under a name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Formatter> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Registered names, for "valid values" error messages.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Instantiate the formatter registered under `name`.
    pub fn resolve(&self, name: &str) -> Option<Box<dyn Formatter>> {
        self.factories.get(name).map(|factory| factory())
    }
}
