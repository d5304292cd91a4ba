//! Notice types: the diagnostics produced by tool adapters

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

use crate::severity::Severity;

/// Location information for a single occurrence within a file.
///
/// Lines and columns are 1-based. A notice may carry zero, one, or many
/// locations (one per occurrence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Optional end position for ranges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl Location {
    /// Create a location from a line number alone.
    pub fn line(line: u32) -> Self {
        Self {
            line,
            column: None,
            end_line: None,
            end_column: None,
        }
    }

    /// Create a location with line and column.
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column: Some(column),
            end_line: None,
            end_column: None,
        }
    }

    /// Create a location spanning to an end position.
    pub fn span(line: u32, column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            line,
            column: Some(column),
            end_line: Some(end_line),
            end_column: Some(end_column),
        }
    }

    fn sort_key(&self) -> (u32, Option<u32>, Option<u32>, Option<u32>) {
        (self.line, self.column, self.end_line, self.end_column)
    }
}

/// One diagnostic finding produced by a tool adapter for one file.
///
/// Immutable after creation; only filtered and sorted downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    /// File the notice applies to
    pub file: PathBuf,
    /// Name of the linter that produced it
    pub linter: String,
    /// Optional tool-specific rule identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Severity of the finding
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Occurrences within the file, possibly empty
    pub locations: Vec<Location>,
}

impl Notice {
    /// Create a new notice.
    pub fn new(
        file: impl Into<PathBuf>,
        linter: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            linter: linter.into(),
            rule: None,
            severity,
            message: message.into(),
            locations: Vec::new(),
        }
    }

    /// Set the rule identifier.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Add one location occurrence.
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    /// Ordering key over the location list: element-wise ascending by
    /// `(line, column, end_line, end_column)`; when one list is a prefix of
    /// the other, the shorter list sorts after the longer one.
    pub fn location_ordering(&self, other: &Notice) -> Ordering {
        for (a, b) in self.locations.iter().zip(other.locations.iter()) {
            match a.sort_key().cmp(&b.sort_key()) {
                Ordering::Equal => continue,
                non_eq => return non_eq,
            }
        }
        other.locations.len().cmp(&self.locations.len())
    }
}

/// Result of analyzing one file.
///
/// `NotAnalyzed` is a distinguished sentinel: no checker applied to the file
/// at all. It is not the same thing as `Analyzed` with zero findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "notices")]
pub enum FileReport {
    /// No checker's patterns matched this file
    NotAnalyzed,
    /// At least one checker applied; the notices that survived filtering
    Analyzed(Vec<Notice>),
}

impl FileReport {
    /// Whether any checker applied to the file.
    pub fn is_analyzed(&self) -> bool {
        matches!(self, FileReport::Analyzed(_))
    }

    /// The notices, if the file was analyzed.
    pub fn notices(&self) -> Option<&[Notice]> {
        match self {
            FileReport::NotAnalyzed => None,
            FileReport::Analyzed(notices) => Some(notices),
        }
    }
}

/// Reduce notices to the run-wide worst-case severity.
///
/// Returns `None` (the "no severity" sentinel, distinct from `Off`) when the
/// iterator yields no notices.
pub fn overall_severity<'a, I>(notices: I) -> Option<Severity>
where
    I: IntoIterator<Item = &'a Notice>,
{
    notices.into_iter().map(|n| n.severity).min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice_at(locations: Vec<Location>) -> Notice {
        let mut n = Notice::new("a.js", "test", Severity::Warn, "msg");
        n.locations = locations;
        n
    }

    #[test]
    fn orders_by_line_then_column() {
        let a = notice_at(vec![Location::new(1, 5)]);
        let b = notice_at(vec![Location::new(2, 1)]);
        let c = notice_at(vec![Location::new(2, 3)]);

        assert_eq!(a.location_ordering(&b), Ordering::Less);
        assert_eq!(b.location_ordering(&c), Ordering::Less);
        assert_eq!(c.location_ordering(&a), Ordering::Greater);
    }

    #[test]
    fn shorter_prefix_sorts_after_longer() {
        let long = notice_at(vec![Location::new(1, 1), Location::new(3, 1)]);
        let short = notice_at(vec![Location::new(1, 1)]);

        assert_eq!(short.location_ordering(&long), Ordering::Greater);
        assert_eq!(long.location_ordering(&short), Ordering::Less);
    }

    #[test]
    fn empty_locations_sort_last() {
        let located = notice_at(vec![Location::new(1, 1)]);
        let bare = notice_at(vec![]);

        assert_eq!(bare.location_ordering(&located), Ordering::Greater);
    }

    #[test]
    fn overall_severity_is_most_severe() {
        let notices = vec![
            Notice::new("a", "x", Severity::Error, "m"),
            Notice::new("b", "y", Severity::Warn, "m"),
            Notice::new("c", "z", Severity::Fatal, "m"),
        ];
        assert_eq!(overall_severity(&notices), Some(Severity::Fatal));
    }

    #[test]
    fn overall_severity_empty_is_none() {
        let empty: Vec<Notice> = Vec::new();
        assert_eq!(overall_severity(&empty), None);
    }
}
