//! Regex-rule adapter
//!
//! Scans file content against configured regular-expression rules and emits
//! one notice per match. Entirely in-process; useful both on its own (TODO
//! markers, forbidden imports, trailing whitespace) and as the reference
//! adapter in tests.

use std::path::Path;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::adapter::{Adapter, AdapterContext};
use crate::error::BentoError;
use crate::notice::{Location, Notice};
use crate::result::Result;
use crate::severity::Severity;

/// Options document accepted by [`GrepAdapter`].
#[derive(Debug, Deserialize)]
struct GrepOptions {
    #[serde(default)]
    rules: Vec<GrepRule>,
}

#[derive(Debug, Deserialize)]
struct GrepRule {
    /// Regular expression evaluated per line
    pattern: String,
    /// Message attached to every match
    message: String,
    /// Severity of produced notices, warn when unspecified
    severity: Option<Severity>,
    /// Optional rule identifier
    rule: Option<String>,
}

/// Built-in adapter matching regex rules against file content.
#[derive(Debug, Default)]
pub struct GrepAdapter;

impl GrepAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Adapter for GrepAdapter {
    fn name(&self) -> &str {
        "grep"
    }

    async fn lint(&self, file: &Path, ctx: &AdapterContext) -> Result<Vec<Notice>> {
        let options = parse_options(&ctx.options)?;
        if options.rules.is_empty() {
            return Ok(Vec::new());
        }

        let rules = options
            .rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern).map_err(|e| {
                    BentoError::adapter("grep", format!("invalid rule pattern '{}': {e}", rule.pattern))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let content = tokio::fs::read_to_string(file)
            .await
            .map_err(|e| BentoError::adapter("grep", format!("cannot read {}: {e}", file.display())))?;

        let mut notices = Vec::new();
        for (line_index, line) in content.lines().enumerate() {
            for (rule, regex) in options.rules.iter().zip(rules.iter()) {
                for found in regex.find_iter(line) {
                    let column = line[..found.start()].chars().count() as u32 + 1;
                    let mut notice = Notice::new(
                        file,
                        "grep",
                        rule.severity.unwrap_or(Severity::Warn),
                        rule.message.clone(),
                    )
                    .with_location(Location::new(line_index as u32 + 1, column));
                    if let Some(id) = &rule.rule {
                        notice = notice.with_rule(id.clone());
                    }
                    notices.push(notice);
                }
            }
        }

        Ok(notices)
    }
}

fn parse_options(options: &Value) -> Result<GrepOptions> {
    serde_json::from_value(options.clone())
        .map_err(|e| BentoError::adapter("grep", format!("invalid options: {e}")))
}
