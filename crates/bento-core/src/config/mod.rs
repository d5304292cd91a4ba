//! Configuration model, discovery, and normalization
//!
//! A bento configuration is a layered document: global defaults, a list of
//! report sinks, and a list of checkers, each binding path patterns to tool
//! invocations and optionally narrowing them further through overrides.
//!
//! The types here are the *normalized* form: built once per run from the raw
//! document and read-only afterwards. `Option` fields on nested layers are
//! the explicit "inherit from parent" sentinel, distinct from any default.

mod loader;
mod normalize;

pub use loader::{CONFIG_FILENAMES, ConfigLoader};
pub use normalize::{NormalizeContext, normalize};

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::adapter::Adapter;
use crate::formatter::Formatter;
use crate::severity::Severity;

/// One tool invocation as configured, before flattening.
pub struct LinterSpec {
    /// The configured reference, including any variant suffix
    pub name: String,
    /// Resolved adapter implementation
    pub adapter: Arc<dyn Adapter>,
    /// Explicit fix flag, or inherit
    pub fix: Option<bool>,
    /// Explicit severity ceiling, or inherit
    pub level: Option<Severity>,
    /// Partial option documents, merged in order at flatten time. When the
    /// name carried a variant suffix, the variant's default document is the
    /// first element.
    pub options: Vec<Value>,
}

impl fmt::Debug for LinterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinterSpec")
            .field("name", &self.name)
            .field("fix", &self.fix)
            .field("level", &self.level)
            .field("options", &self.options)
            .finish()
    }
}

/// A sub-scope narrowing a checker's patterns, optionally replacing its tool
/// list.
#[derive(Debug)]
pub struct Override {
    pub patterns: Vec<String>,
    pub fix: Option<bool>,
    pub level: Option<Severity>,
    pub linters: Vec<LinterSpec>,
}

/// A named scope binding path patterns to tool invocations.
#[derive(Debug)]
pub struct Checker {
    pub patterns: Vec<String>,
    pub fix: Option<bool>,
    pub level: Option<Severity>,
    pub linters: Vec<LinterSpec>,
    pub overrides: Vec<Override>,
}

/// One configured report sink.
pub struct ReporterSpec {
    /// Registry name of the formatter
    pub name: String,
    /// Instantiated formatter
    pub formatter: Box<dyn Formatter>,
    /// Explicit severity ceiling, or inherit the global one
    pub level: Option<Severity>,
    /// Partial option documents, merged in order
    pub options: Vec<Value>,
}

impl fmt::Debug for ReporterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterSpec")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("options", &self.options)
            .finish()
    }
}

/// The fully typed configuration: global fields resolved to concrete values,
/// nested layers keeping their inherit sentinels for the flattener.
#[derive(Debug)]
pub struct NormalizedConfig {
    pub patterns: Vec<String>,
    pub fix: bool,
    pub level: Severity,
    pub reporters: Vec<ReporterSpec>,
    pub checkers: Vec<Checker>,
}
