//! Severity levels governing filtering and run-wide summarization

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a notice, totally ordered: a *smaller* value is *more* severe.
///
/// `Off` is a sentinel meaning "report nothing". A configured level acts as a
/// ceiling: a notice is shown iff `level >= notice.severity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Off = 0,
    Fatal = 1,
    Error = 2,
    Warn = 3,
    Info = 4,
}

impl Severity {
    /// All severities, in numeric order. Used for "valid values" error messages.
    pub const ALL: [Severity; 5] = [
        Severity::Off,
        Severity::Fatal,
        Severity::Error,
        Severity::Warn,
        Severity::Info,
    ];

    /// Parse a severity from its case-insensitive name.
    pub fn from_name(name: &str) -> Option<Severity> {
        match name.to_ascii_lowercase().as_str() {
            "off" => Some(Severity::Off),
            "fatal" => Some(Severity::Fatal),
            "error" => Some(Severity::Error),
            "warn" => Some(Severity::Warn),
            "info" => Some(Severity::Info),
            _ => None,
        }
    }

    /// Parse a severity from its raw numeric value.
    pub fn from_value(value: i64) -> Option<Severity> {
        match value {
            0 => Some(Severity::Off),
            1 => Some(Severity::Fatal),
            2 => Some(Severity::Error),
            3 => Some(Severity::Warn),
            4 => Some(Severity::Info),
            _ => None,
        }
    }

    /// Name of this severity, as accepted by [`Severity::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
        }
    }

    /// Whether a notice of severity `other` passes a ceiling of `self`.
    pub fn shows(&self, other: Severity) -> bool {
        *self >= other
    }

    /// Clamp this level so it is never less restrictive than `ceiling`.
    ///
    /// Clamps down (towards more severe), never up.
    pub fn clamp_to(&self, ceiling: Severity) -> Severity {
        (*self).min(ceiling)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_numeric_encoding() {
        assert!(Severity::Off < Severity::Fatal);
        assert!(Severity::Fatal < Severity::Error);
        assert!(Severity::Error < Severity::Warn);
        assert!(Severity::Warn < Severity::Info);
    }

    #[test]
    fn level_acts_as_ceiling() {
        // level = error shows fatal and error, hides warn and info
        assert!(Severity::Error.shows(Severity::Fatal));
        assert!(Severity::Error.shows(Severity::Error));
        assert!(!Severity::Error.shows(Severity::Warn));
        assert!(!Severity::Error.shows(Severity::Info));

        // off shows nothing producible
        assert!(!Severity::Off.shows(Severity::Fatal));
    }

    #[test]
    fn parse_names_case_insensitive() {
        assert_eq!(Severity::from_name("WARN"), Some(Severity::Warn));
        assert_eq!(Severity::from_name("Fatal"), Some(Severity::Fatal));
        assert_eq!(Severity::from_name("off"), Some(Severity::Off));
        assert_eq!(Severity::from_name("bogus"), None);
    }

    #[test]
    fn parse_raw_values() {
        assert_eq!(Severity::from_value(0), Some(Severity::Off));
        assert_eq!(Severity::from_value(4), Some(Severity::Info));
        assert_eq!(Severity::from_value(5), None);
        assert_eq!(Severity::from_value(-1), None);
    }

    #[test]
    fn clamp_never_loosens() {
        assert_eq!(Severity::Info.clamp_to(Severity::Error), Severity::Error);
        assert_eq!(Severity::Fatal.clamp_to(Severity::Error), Severity::Fatal);
        assert_eq!(Severity::Error.clamp_to(Severity::Error), Severity::Error);
    }
}
