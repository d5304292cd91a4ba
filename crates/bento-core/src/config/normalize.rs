//! Configuration normalization
//!
//! Turns a loosely structured, partially specified document into a
//! [`NormalizedConfig`]. Every type/shape violation raises an error carrying
//! the offending property path; unknown enum values (severity, adapter and
//! formatter names) raise errors enumerating the valid set.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::{Checker, LinterSpec, NormalizedConfig, Override, ReporterSpec};
use crate::adapter::AdapterRegistry;
use crate::error::BentoError;
use crate::formatter::FormatterRegistry;
use crate::result::Result;
use crate::severity::Severity;

/// Ambient defaults and registries for one normalization pass.
pub struct NormalizeContext<'a> {
    pub adapters: &'a AdapterRegistry,
    pub formatters: &'a FormatterRegistry,
    /// Directory external option files resolve against
    pub config_dir: &'a Path,
    /// Patterns used when the document specifies none
    pub default_patterns: Vec<String>,
    /// Fix flag used when the document specifies none
    pub default_fix: bool,
    /// Severity ceiling the resolved global level may never exceed
    pub level_ceiling: Severity,
}

impl<'a> NormalizeContext<'a> {
    pub fn new(
        adapters: &'a AdapterRegistry,
        formatters: &'a FormatterRegistry,
        config_dir: &'a Path,
    ) -> Self {
        Self {
            adapters,
            formatters,
            config_dir,
            default_patterns: vec!["**".to_string()],
            default_fix: false,
            level_ceiling: Severity::Info,
        }
    }
}

/// Normalize a configuration document.
pub fn normalize(document: &Value, ctx: &NormalizeContext<'_>) -> Result<NormalizedConfig> {
    let object = document.as_object().ok_or_else(|| {
        BentoError::config_shape("", format!("expected an object, got {}", type_name(document)))
    })?;

    let patterns = normalize_patterns(object.get("patterns"), "patterns")?
        .unwrap_or_else(|| ctx.default_patterns.clone());
    let fix = normalize_fix(object.get("fix"), "fix")?.unwrap_or(ctx.default_fix);
    let level = normalize_level(object.get("level"), "level")?
        .map(|l| l.clamp_to(ctx.level_ceiling))
        .unwrap_or(ctx.level_ceiling);

    let reporters = match object.get("reporters") {
        None => Vec::new(),
        Some(value) => one_or_many(value, "reporters")
            .into_iter()
            .map(|(item, path)| normalize_reporter(item, &path, ctx, level))
            .collect::<Result<Vec<_>>>()?,
    };

    let checkers_value = object
        .get("checkers")
        .ok_or_else(|| BentoError::config_shape("checkers", "at least one checker is required"))?;
    let checker_items = one_or_many(checkers_value, "checkers");
    if checker_items.is_empty() {
        return Err(BentoError::config_shape(
            "checkers",
            "at least one checker is required",
        ));
    }
    let checkers = checker_items
        .into_iter()
        .map(|(item, path)| normalize_checker(item, &path, ctx, level))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        checkers = checkers.len(),
        reporters = reporters.len(),
        level = %level,
        "normalized configuration"
    );

    Ok(NormalizedConfig {
        patterns,
        fix,
        level,
        reporters,
        checkers,
    })
}

fn normalize_checker(
    value: &Value,
    path: &str,
    ctx: &NormalizeContext<'_>,
    parent_level: Severity,
) -> Result<Checker> {
    let object = value.as_object().ok_or_else(|| {
        BentoError::config_shape(path, format!("expected an object, got {}", type_name(value)))
    })?;

    let patterns = normalize_patterns(object.get("patterns"), &join(path, "patterns"))?
        .unwrap_or_else(|| vec!["**".to_string()]);
    let fix = normalize_fix(object.get("fix"), &join(path, "fix"))?;
    let level = normalize_level(object.get("level"), &join(path, "level"))?
        .map(|l| l.clamp_to(parent_level));
    let resolved = level.unwrap_or(parent_level);

    let linters = normalize_linters(object.get("linters"), &join(path, "linters"), ctx, resolved)?;

    let overrides = match object.get("overrides") {
        None => Vec::new(),
        Some(value) => one_or_many(value, &join(path, "overrides"))
            .into_iter()
            .map(|(item, item_path)| normalize_override(item, &item_path, ctx, resolved))
            .collect::<Result<Vec<_>>>()?,
    };

    Ok(Checker {
        patterns,
        fix,
        level,
        linters,
        overrides,
    })
}

fn normalize_override(
    value: &Value,
    path: &str,
    ctx: &NormalizeContext<'_>,
    parent_level: Severity,
) -> Result<Override> {
    let object = value.as_object().ok_or_else(|| {
        BentoError::config_shape(path, format!("expected an object, got {}", type_name(value)))
    })?;

    let patterns =
        normalize_patterns(object.get("patterns"), &join(path, "patterns"))?.unwrap_or_default();
    let fix = normalize_fix(object.get("fix"), &join(path, "fix"))?;
    let level = normalize_level(object.get("level"), &join(path, "level"))?
        .map(|l| l.clamp_to(parent_level));
    let resolved = level.unwrap_or(parent_level);

    let linters = normalize_linters(object.get("linters"), &join(path, "linters"), ctx, resolved)?;

    Ok(Override {
        patterns,
        fix,
        level,
        linters,
    })
}

fn normalize_linters(
    value: Option<&Value>,
    path: &str,
    ctx: &NormalizeContext<'_>,
    parent_level: Severity,
) -> Result<Vec<LinterSpec>> {
    match value {
        None => Ok(Vec::new()),
        Some(value) => one_or_many(value, path)
            .into_iter()
            .map(|(item, item_path)| normalize_linter(item, &item_path, ctx, parent_level))
            .collect(),
    }
}

fn normalize_linter(
    value: &Value,
    path: &str,
    ctx: &NormalizeContext<'_>,
    parent_level: Severity,
) -> Result<LinterSpec> {
    let (name, fix, level, mut options) = match value {
        Value::String(name) => (name.clone(), None, None, Vec::new()),
        Value::Object(object) => {
            let name = match object.get("linter") {
                Some(Value::String(name)) => name.clone(),
                Some(other) => {
                    return Err(BentoError::config_shape(
                        join(path, "linter"),
                        format!("expected a string, got {}", type_name(other)),
                    ));
                }
                None => {
                    return Err(BentoError::config_shape(
                        join(path, "linter"),
                        "missing required property",
                    ));
                }
            };
            let fix = normalize_fix(object.get("fix"), &join(path, "fix"))?;
            let level = normalize_level(object.get("level"), &join(path, "level"))?
                .map(|l| l.clamp_to(parent_level));
            let options =
                normalize_options(object.get("options"), &join(path, "options"), ctx.config_dir)?;
            (name, fix, level, options)
        }
        other => {
            return Err(BentoError::config_shape(
                path,
                format!("expected a linter name or object, got {}", type_name(other)),
            ));
        }
    };

    let resolved = ctx.adapters.resolve(&name).ok_or_else(|| {
        BentoError::config_value(
            path,
            format!(
                "unknown linter '{}' (registered: {})",
                name,
                ctx.adapters.names().join(", ")
            ),
        )
    })?;
    if let Some(defaults) = resolved.default_options {
        options.insert(0, defaults);
    }

    Ok(LinterSpec {
        name,
        adapter: resolved.adapter,
        fix,
        level,
        options,
    })
}

fn normalize_reporter(
    value: &Value,
    path: &str,
    ctx: &NormalizeContext<'_>,
    global_level: Severity,
) -> Result<ReporterSpec> {
    let (name, level, options) = match value {
        Value::String(name) => (name.clone(), None, Vec::new()),
        Value::Object(object) => {
            let name = match object.get("formatter") {
                Some(Value::String(name)) => name.clone(),
                Some(other) => {
                    return Err(BentoError::config_shape(
                        join(path, "formatter"),
                        format!("expected a string, got {}", type_name(other)),
                    ));
                }
                None => {
                    return Err(BentoError::config_shape(
                        join(path, "formatter"),
                        "missing required property",
                    ));
                }
            };
            let level = normalize_level(object.get("level"), &join(path, "level"))?
                .map(|l| l.clamp_to(global_level));
            let options =
                normalize_options(object.get("options"), &join(path, "options"), ctx.config_dir)?;
            (name, level, options)
        }
        other => {
            return Err(BentoError::config_shape(
                path,
                format!(
                    "expected a formatter name or object, got {}",
                    type_name(other)
                ),
            ));
        }
    };

    let formatter = ctx.formatters.resolve(&name).ok_or_else(|| {
        BentoError::config_value(
            path,
            format!(
                "unknown formatter '{}' (registered: {})",
                name,
                ctx.formatters.names().join(", ")
            ),
        )
    })?;

    Ok(ReporterSpec {
        name,
        formatter,
        level,
        options,
    })
}

fn normalize_patterns(value: Option<&Value>, path: &str) -> Result<Option<Vec<String>>> {
    match value {
        None => Ok(None),
        Some(Value::String(pattern)) => Ok(Some(vec![pattern.clone()])),
        Some(Value::Array(items)) => {
            let mut patterns = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(pattern) => patterns.push(pattern.clone()),
                    other => {
                        return Err(BentoError::config_shape(
                            format!("{path}[{i}]"),
                            format!("expected a string, got {}", type_name(other)),
                        ));
                    }
                }
            }
            Ok(Some(patterns))
        }
        Some(other) => Err(BentoError::config_shape(
            path,
            format!(
                "expected a pattern or array of patterns, got {}",
                type_name(other)
            ),
        )),
    }
}

fn normalize_fix(value: Option<&Value>, path: &str) -> Result<Option<bool>> {
    match value {
        None => Ok(None),
        Some(Value::Bool(fix)) => Ok(Some(*fix)),
        Some(other) => Err(BentoError::config_shape(
            path,
            format!("expected a boolean, got {}", type_name(other)),
        )),
    }
}

fn normalize_level(value: Option<&Value>, path: &str) -> Result<Option<Severity>> {
    match value {
        None => Ok(None),
        Some(Value::String(name)) => Severity::from_name(name).map(Some).ok_or_else(|| {
            BentoError::config_value(
                path,
                format!("unknown severity '{name}' (valid: {})", valid_severities()),
            )
        }),
        Some(Value::Number(number)) => match number.as_i64().and_then(Severity::from_value) {
            Some(level) => Ok(Some(level)),
            None => Err(BentoError::config_value(
                path,
                format!(
                    "unknown severity value {number} (valid: {})",
                    valid_severities()
                ),
            )),
        },
        Some(other) => Err(BentoError::config_shape(
            path,
            format!(
                "expected a severity name or value, got {}",
                type_name(other)
            ),
        )),
    }
}

fn normalize_options(value: Option<&Value>, path: &str, dir: &Path) -> Result<Vec<Value>> {
    match value {
        None => Ok(Vec::new()),
        Some(document @ Value::Object(_)) => Ok(vec![(*document).clone()]),
        Some(Value::String(file)) => Ok(vec![load_options_file(file, path, dir)?]),
        Some(Value::Array(items)) => {
            let mut documents = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::Object(_) => documents.push(item.clone()),
                    Value::String(file) => {
                        documents.push(load_options_file(file, &format!("{path}[{i}]"), dir)?);
                    }
                    other => {
                        return Err(BentoError::config_shape(
                            format!("{path}[{i}]"),
                            format!(
                                "expected an options document or file path, got {}",
                                type_name(other)
                            ),
                        ));
                    }
                }
            }
            Ok(documents)
        }
        Some(other) => Err(BentoError::config_shape(
            path,
            format!(
                "expected an options document, file path, or list of them, got {}",
                type_name(other)
            ),
        )),
    }
}

fn load_options_file(file: &str, path: &str, dir: &Path) -> Result<Value> {
    let full = dir.join(file);
    let content = std::fs::read_to_string(&full).map_err(|e| BentoError::io(&full, e))?;
    json5::from_str(&content).map_err(|e| {
        BentoError::config_shape(path, format!("'{file}' is not a valid options document: {e}"))
    })
}

/// Accept a single object or an array of objects, pairing each element with
/// its property path.
fn one_or_many<'v>(value: &'v Value, path: &str) -> Vec<(&'v Value, String)> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| (item, format!("{path}[{i}]")))
            .collect(),
        other => vec![(other, path.to_string())],
    }
}

fn join(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}

fn valid_severities() -> String {
    Severity::ALL
        .iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Adapter, AdapterContext};
    use crate::error::ErrorKind;
    use crate::formatter::Formatter;
    use crate::notice::{FileReport, Notice};
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Arc;

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

    struct NullFormatter;

    #[async_trait]
    impl Formatter for NullFormatter {
        async fn notify(&mut self, _file: &Path, _report: &FileReport) -> Result<()> {
            Ok(())
        }

        async fn finalize(&mut self, _overall: Option<Severity>) -> Result<()> {
            Ok(())
        }
    }

    fn registries() -> (AdapterRegistry, FormatterRegistry) {
        let mut adapters = AdapterRegistry::new();
        adapters.register(Arc::new(StubAdapter { name: "eslint" }));
        adapters.register(Arc::new(StubAdapter { name: "beautify" }));
        let mut formatters = FormatterRegistry::new();
        formatters.register("stylish", || Box::new(NullFormatter));
        (adapters, formatters)
    }

    fn normalize_doc(doc: Value) -> Result<NormalizedConfig> {
        let (adapters, formatters) = registries();
        let dir = PathBuf::from(".");
        let ctx = NormalizeContext::new(&adapters, &formatters, &dir);
        normalize(&doc, &ctx)
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let config = normalize_doc(json!({
            "checkers": [{ "patterns": "*.js", "linters": "eslint" }]
        }))
        .unwrap();

        assert_eq!(config.patterns, vec!["**"]);
        assert!(!config.fix);
        assert_eq!(config.level, Severity::Info);
        assert!(config.reporters.is_empty());
        assert_eq!(config.checkers.len(), 1);
        assert_eq!(config.checkers[0].patterns, vec!["*.js"]);
        assert_eq!(config.checkers[0].linters[0].name, "eslint");
    }

    #[test]
    fn pattern_string_becomes_singleton_list() {
        let config = normalize_doc(json!({
            "patterns": "src/**",
            "checkers": { "linters": "eslint" }
        }))
        .unwrap();

        assert_eq!(config.patterns, vec!["src/**"]);
    }

    #[test]
    fn non_string_pattern_is_a_shape_error() {
        let err = normalize_doc(json!({
            "patterns": ["ok", 42],
            "checkers": { "linters": "eslint" }
        }))
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigShape);
        assert!(err.to_string().contains("patterns[1]"));
    }

    #[test]
    fn missing_checkers_is_an_error() {
        let err = normalize_doc(json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigShape);
        assert!(err.to_string().contains("checkers"));
    }

    #[test]
    fn empty_checkers_is_an_error() {
        assert!(normalize_doc(json!({ "checkers": [] })).is_err());
    }

    #[test]
    fn unknown_severity_name_lists_valid_set() {
        let err = normalize_doc(json!({
            "level": "loud",
            "checkers": { "linters": "eslint" }
        }))
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigValue);
        let message = err.to_string();
        assert!(message.contains("loud"));
        assert!(message.contains("off, fatal, error, warn, info"));
    }

    #[test]
    fn raw_severity_value_is_accepted() {
        let config = normalize_doc(json!({
            "level": 2,
            "checkers": { "linters": "eslint" }
        }))
        .unwrap();

        assert_eq!(config.level, Severity::Error);
    }

    #[test]
    fn severity_names_parse_case_insensitively() {
        let config = normalize_doc(json!({
            "level": "WARN",
            "checkers": { "linters": "eslint" }
        }))
        .unwrap();

        assert_eq!(config.level, Severity::Warn);
    }

    #[test]
    fn unknown_linter_lists_registered_names() {
        let err = normalize_doc(json!({
            "checkers": { "linters": "clippy" }
        }))
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigValue);
        let message = err.to_string();
        assert!(message.contains("clippy"));
        assert!(message.contains("eslint"));
    }

    #[test]
    fn unknown_formatter_is_a_value_error() {
        let err = normalize_doc(json!({
            "reporters": "teamcity",
            "checkers": { "linters": "eslint" }
        }))
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigValue);
    }

    #[test]
    fn variant_suffix_prepends_default_options() {
        let config = normalize_doc(json!({
            "checkers": {
                "linters": { "linter": "beautify_html", "options": { "wrap": 80 } }
            }
        }))
        .unwrap();

        let linter = &config.checkers[0].linters[0];
        assert_eq!(linter.adapter.name(), "beautify");
        assert_eq!(linter.options[0], json!({ "preset": "html" }));
        assert_eq!(linter.options[1], json!({ "wrap": 80 }));
    }

    #[test]
    fn checker_level_clamps_to_global() {
        let config = normalize_doc(json!({
            "level": "error",
            "checkers": {
                "level": "info",
                "linters": "eslint"
            }
        }))
        .unwrap();

        // info would be looser than the global error ceiling
        assert_eq!(config.checkers[0].level, Some(Severity::Error));
    }

    #[test]
    fn override_level_clamps_through_every_depth() {
        let config = normalize_doc(json!({
            "level": "warn",
            "checkers": {
                "level": "error",
                "linters": "eslint",
                "overrides": {
                    "patterns": "legacy/**",
                    "level": "info",
                    "linters": { "linter": "eslint", "level": "warn" }
                }
            }
        }))
        .unwrap();

        let checker = &config.checkers[0];
        assert_eq!(checker.level, Some(Severity::Error));
        let override_ = &checker.overrides[0];
        assert_eq!(override_.level, Some(Severity::Error));
        assert_eq!(override_.linters[0].level, Some(Severity::Error));
    }

    #[test]
    fn fix_type_error_names_the_path() {
        let err = normalize_doc(json!({
            "checkers": { "fix": "yes", "linters": "eslint" }
        }))
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigShape);
        assert!(err.to_string().contains("checkers.fix"));
    }

    #[test]
    fn absent_fix_stays_inherit() {
        let config = normalize_doc(json!({
            "checkers": { "linters": "eslint" }
        }))
        .unwrap();

        assert_eq!(config.checkers[0].fix, None);
    }

    #[test]
    fn options_file_is_loaded_relative_to_config_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("opts.json"), r#"{ "indent": 4 }"#).unwrap();

        let (adapters, formatters) = registries();
        let ctx = NormalizeContext::new(&adapters, &formatters, dir.path());
        let config = normalize(
            &json!({
                "checkers": {
                    "linters": { "linter": "eslint", "options": ["opts.json", { "semi": true }] }
                }
            }),
            &ctx,
        )
        .unwrap();

        let linter = &config.checkers[0].linters[0];
        assert_eq!(linter.options[0], json!({ "indent": 4 }));
        assert_eq!(linter.options[1], json!({ "semi": true }));
    }

    #[test]
    fn single_checker_object_normalizes_like_a_list() {
        let config = normalize_doc(json!({
            "checkers": { "patterns": ["*.md"], "linters": ["eslint", "beautify"] }
        }))
        .unwrap();

        assert_eq!(config.checkers.len(), 1);
        assert_eq!(config.checkers[0].linters.len(), 2);
    }
}
