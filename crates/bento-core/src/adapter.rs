//! Adapter contract and registry
//!
//! An adapter bridges one external analysis tool into the notice model. The
//! orchestrator treats adapters as opaque, concurrently invocable operations;
//! the registry is a closed name → implementation table, validated at
//! configuration-normalization time and never consulted during a run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::notice::Notice;
use crate::result::Result;
use crate::severity::Severity;

/// Per-invocation context handed to an adapter.
#[derive(Debug, Clone)]
pub struct AdapterContext {
    /// Effective severity ceiling for this invocation
    pub level: Severity,
    /// Whether the adapter may apply automatic fixes
    pub fix: bool,
    /// Root directory of the run
    pub root: PathBuf,
    /// Every file selected for the run (some tools want project context)
    pub files: Arc<Vec<PathBuf>>,
    /// Fully merged options document for this invocation
    pub options: Value,
}

/// Contract every tool adapter implements.
///
/// Adapters must be safely invocable concurrently for distinct files.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Registry name of this adapter.
    fn name(&self) -> &str;

    /// The most severe notice this adapter can ever produce.
    ///
    /// The orchestrator skips invoking the adapter when the configured level
    /// would filter everything it could report.
    fn best_severity(&self) -> Severity {
        Severity::Fatal
    }

    /// Default options document for a named variant, if the adapter defines
    /// one. Lets `name_variant` config references select e.g. a
    /// language-specific default option set for a generic tool.
    fn default_options(&self, variant: &str) -> Option<Value> {
        let _ = variant;
        None
    }

    /// Analyze one file, returning the notices found in it.
    async fn lint(&self, file: &Path, ctx: &AdapterContext) -> Result<Vec<Notice>>;
}

/// A resolved adapter reference: the implementation plus the variant-supplied
/// default options document, when the name carried a variant suffix.
#[derive(Clone)]
pub struct ResolvedAdapter {
    pub adapter: Arc<dyn Adapter>,
    pub default_options: Option<Value>,
}

/// Closed name → adapter table.
///
/// Custom adapters are supported by registering them before configuration
/// normalization; lookups never happen at lint time.
#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: BTreeMap<String, Arc<dyn Adapter>>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in adapters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::adapters::ExecAdapter::new()));
        registry.register(Arc::new(crate::adapters::GrepAdapter::new()));
        registry
    }

    /// Register an adapter under its own name. Later registrations replace
    /// earlier ones.
    pub fn register(&mut self, adapter: Arc<dyn Adapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    /// Registered names, for "valid values" error messages.
    pub fn names(&self) -> Vec<&str> {
        self.adapters.keys().map(String::as_str).collect()
    }

    /// Resolve a configured reference, honoring the `name_variant` suffix
    /// convention: an exact name wins; otherwise the reference splits at the
    /// first underscore flanked by alphanumerics and the suffix selects the
    /// adapter's default options document for that variant.
    pub fn resolve(&self, reference: &str) -> Option<ResolvedAdapter> {
        if let Some(adapter) = self.adapters.get(reference) {
            return Some(ResolvedAdapter {
                adapter: Arc::clone(adapter),
                default_options: None,
            });
        }

        let (base, variant) = split_variant(reference)?;
        let adapter = self.adapters.get(base)?;
        Some(ResolvedAdapter {
            default_options: adapter.default_options(variant),
            adapter: Arc::clone(adapter),
        })
    }
}

/// Split `name_variant` at the first underscore flanked by alphanumerics.
///
/// Double underscores never split: neither side of `__` has an alphanumeric
/// on both flanks at the underscore in question.
pub(crate) fn split_variant(reference: &str) -> Option<(&str, &str)> {
    let bytes = reference.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let before_ok = i > 0 && bytes[i - 1].is_ascii_alphanumeric();
        let after_ok = i + 1 < bytes.len() && bytes[i + 1].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return Some((&reference[..i], &reference[i + 1..]));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StubAdapter {
        name: &'static str,
    }

    #[async_trait]
    impl Adapter for StubAdapter {
        fn name(&self) -> &str {
            self.name
        }

        fn default_options(&self, variant: &str) -> Option<Value> {
            Some(json!({ "preset": variant }))
        }

        async fn lint(&self, _file: &Path, _ctx: &AdapterContext) -> Result<Vec<Notice>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn exact_name_resolves_without_defaults() {
        let mut registry = AdapterRegistry::new();
        registry.register(Arc::new(StubAdapter { name: "beautify" }));

        let resolved = registry.resolve("beautify").unwrap();
        assert_eq!(resolved.adapter.name(), "beautify");
        assert!(resolved.default_options.is_none());
    }

    #[test]
    fn variant_suffix_selects_default_options() {
        let mut registry = AdapterRegistry::new();
        registry.register(Arc::new(StubAdapter { name: "beautify" }));

        let resolved = registry.resolve("beautify_html").unwrap();
        assert_eq!(resolved.adapter.name(), "beautify");
        assert_eq!(resolved.default_options, Some(json!({ "preset": "html" })));
    }

    #[test]
    fn exact_name_wins_over_variant_split() {
        let mut registry = AdapterRegistry::new();
        registry.register(Arc::new(StubAdapter { name: "beautify" }));
        registry.register(Arc::new(StubAdapter {
            name: "beautify_css",
        }));

        let resolved = registry.resolve("beautify_css").unwrap();
        assert_eq!(resolved.adapter.name(), "beautify_css");
        assert!(resolved.default_options.is_none());
    }

    #[test]
    fn unknown_name_is_none() {
        let registry = AdapterRegistry::new();
        assert!(registry.resolve("nope").is_none());
    }

    #[test]
    fn double_underscore_does_not_split() {
        assert_eq!(split_variant("some__tool"), None);
        assert_eq!(split_variant("beautify_html"), Some(("beautify", "html")));
        assert_eq!(split_variant("_leading"), None);
        assert_eq!(split_variant("trailing_"), None);
        assert_eq!(split_variant("a_b_c"), Some(("a", "b_c")));
    }
}
