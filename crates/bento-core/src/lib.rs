//! Bento Core
//!
//! Orchestration engine for the bento meta-linter: resolves which files in a
//! tree are subject to analysis, determines which external tools apply to
//! each with what options and severity floor, runs everything concurrently
//! with order-stable aggregation, and reduces the run to a single worst-case
//! severity.

pub mod adapter;
pub mod adapters;
pub mod config;
pub mod error;
pub mod flatten;
pub mod formatter;
pub mod formatters;
pub mod merge;
pub mod notice;
pub mod orchestrator;
pub mod pattern;
pub mod reorder;
pub mod result;
pub mod severity;
pub mod walk;

// Re-export commonly used types
pub use adapter::{Adapter, AdapterContext, AdapterRegistry, ResolvedAdapter};
pub use adapters::{ExecAdapter, GrepAdapter};
pub use config::{
    CONFIG_FILENAMES, Checker, ConfigLoader, LinterSpec, NormalizeContext, NormalizedConfig,
    Override, ReporterSpec, normalize,
};
pub use error::{BentoError, ErrorKind};
pub use flatten::{FlattenedChecker, FlattenedLinter, FlattenedOverride, flatten};
pub use formatter::{Formatter, FormatterRegistry};
pub use formatters::{JsonFormatter, StylishFormatter};
pub use merge::{merge, merge_all};
pub use notice::{FileReport, Location, Notice, overall_severity};
pub use orchestrator::{Orchestrator, RunOutcome};
pub use pattern::{Pattern, PatternMatch, match_path, matches_path};
pub use reorder::ReorderBuffer;
pub use result::Result;
pub use severity::Severity;
pub use walk::walk;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    init_tracing_with("bento=warn");
}

/// Initialize tracing with a default filter directive, still overridable via
/// `RUST_LOG`.
pub fn init_tracing_with(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
