//! Configuration flattening
//!
//! Collapses the layered configuration (global → checker → override →
//! per-check) into concrete, ready-to-execute tuples: for every applicable
//! combination, one [`FlattenedLinter`] carrying the resolved adapter, merged
//! options, effective severity ceiling, and effective fix flag.
//!
//! Flattening is pure: idempotent, order-preserving, and siblings never
//! interfere with one another.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::adapter::Adapter;
use crate::config::{Checker, LinterSpec, NormalizedConfig, Override};
use crate::merge::{merge, merge_all};
use crate::pattern::{Pattern, PatternMatch, match_path};
use crate::result::Result;
use crate::severity::Severity;

/// One fully merged, ready-to-execute tool invocation.
pub struct FlattenedLinter {
    pub name: String,
    pub adapter: Arc<dyn Adapter>,
    /// Effective fix flag, resolved through the whole ancestry
    pub fix: bool,
    /// Effective severity ceiling, never looser than any ancestor's
    pub level: Severity,
    /// All option documents merged into one
    pub options: Value,
}

impl fmt::Debug for FlattenedLinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlattenedLinter")
            .field("name", &self.name)
            .field("fix", &self.fix)
            .field("level", &self.level)
            .field("options", &self.options)
            .finish()
    }
}

/// One override scope with its compiled patterns and effective linters.
pub struct FlattenedOverride {
    /// Parent patterns first, own patterns appended after. The parent's
    /// entries are retained, not replaced: a file must still satisfy the
    /// parent scope, and the parent's negations keep vetoing here.
    pub patterns: Vec<Pattern>,
    /// Index where the override's own patterns begin within `patterns`
    own_start: usize,
    pub linters: Vec<FlattenedLinter>,
}

impl FlattenedOverride {
    /// Whether this override scope applies to `path`.
    ///
    /// Requires a positive match from the override's own patterns (when it
    /// has any) *and* from the parent's: an override narrows its checker, it
    /// never widens it. A negation on either side vetoes.
    pub fn applies(&self, path: &Path, root: &Path) -> bool {
        let parent = &self.patterns[..self.own_start];
        let own = &self.patterns[self.own_start..];

        if match_path(parent, path, false, root) != PatternMatch::Matched {
            return false;
        }
        own.is_empty() || match_path(own, path, false, root) == PatternMatch::Matched
    }
}

/// One checker scope with its compiled patterns, effective linters, and
/// flattened overrides.
pub struct FlattenedChecker {
    pub patterns: Vec<Pattern>,
    pub linters: Vec<FlattenedLinter>,
    pub overrides: Vec<FlattenedOverride>,
}

/// Flatten a normalized configuration into executable checker scopes.
///
/// Pattern compilation happens here, so malformed patterns abort before any
/// file system work.
pub fn flatten(config: &NormalizedConfig) -> Result<Vec<FlattenedChecker>> {
    config
        .checkers
        .iter()
        .map(|checker| flatten_checker(checker, config.fix, config.level))
        .collect()
}

fn flatten_checker(
    checker: &Checker,
    parent_fix: bool,
    parent_level: Severity,
) -> Result<FlattenedChecker> {
    let fix = checker.fix.unwrap_or(parent_fix);
    let level = checker.level.unwrap_or(parent_level).clamp_to(parent_level);

    let patterns = Pattern::compile_all(&checker.patterns)?;

    let linters: Vec<FlattenedLinter> = checker
        .linters
        .iter()
        .map(|spec| flatten_linter(spec, fix, level, None))
        .collect();

    // Options resolved at the checker layer, cascaded into override linters
    // for the same adapter reference.
    let checker_options: BTreeMap<&str, &Value> = linters
        .iter()
        .map(|linter| (linter.name.as_str(), &linter.options))
        .collect();

    let overrides = checker
        .overrides
        .iter()
        .map(|override_| {
            flatten_override(override_, checker, fix, level, &checker_options)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FlattenedChecker {
        patterns,
        linters,
        overrides,
    })
}

fn flatten_override(
    override_: &Override,
    checker: &Checker,
    parent_fix: bool,
    parent_level: Severity,
    checker_options: &BTreeMap<&str, &Value>,
) -> Result<FlattenedOverride> {
    let fix = override_.fix.unwrap_or(parent_fix);
    let level = override_.level.unwrap_or(parent_level).clamp_to(parent_level);

    let own_start = checker.patterns.len();
    let mut raw_patterns = checker.patterns.clone();
    raw_patterns.extend(override_.patterns.iter().cloned());
    let patterns = Pattern::compile_all(&raw_patterns)?;

    // An override that declares linters replaces the checker's tool list;
    // one that declares none narrows fix/level only, and the checker's
    // linters cascade through it.
    let linters = if override_.linters.is_empty() {
        checker
            .linters
            .iter()
            .map(|spec| flatten_linter(spec, fix, level, None))
            .collect()
    } else {
        override_
            .linters
            .iter()
            .map(|spec| {
                let parent_options = checker_options.get(spec.name.as_str()).copied();
                flatten_linter(spec, fix, level, parent_options)
            })
            .collect()
    };

    Ok(FlattenedOverride {
        patterns,
        own_start,
        linters,
    })
}

fn flatten_linter(
    spec: &LinterSpec,
    parent_fix: bool,
    parent_level: Severity,
    parent_options: Option<&Value>,
) -> FlattenedLinter {
    let fix = spec.fix.unwrap_or(parent_fix);
    let level = spec.level.unwrap_or(parent_level).clamp_to(parent_level);

    let own = merge_all(&spec.options);
    let options = match parent_options {
        Some(parent) => merge(parent, &own),
        None => own,
    };

    FlattenedLinter {
        name: spec.name.clone(),
        adapter: Arc::clone(&spec.adapter),
        fix,
        level,
        options,
    }
}
