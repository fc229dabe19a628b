//! Severity levels for monitoring messages.
//!
//! Levels are totally ordered from [`Severity::Default`] (unclassified) up to
//! [`Severity::Failure`]. The ordering is the only thing "worst status wins"
//! comparisons look at; color and description are display metadata for a
//! hosting UI.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ResultError;

/// Classification of a message logged by a monitoring module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Unclassified note with no pass/fail meaning
    Default = 0,
    /// The check passed
    Ok = 10,
    /// Informational, not a pass/fail signal
    Info = 20,
    /// Degraded but non-fatal
    Warning = 30,
    /// The check failed
    Failure = 40,
}

impl Severity {
    pub(crate) const COUNT: usize = 5;

    /// Every level, lowest precedence first.
    pub const ALL: [Severity; Self::COUNT] = [
        Severity::Default,
        Severity::Ok,
        Severity::Info,
        Severity::Warning,
        Severity::Failure,
    ];

    /// Iterate levels from most to least severe.
    pub fn worst_first() -> impl Iterator<Item = Severity> {
        Self::ALL.into_iter().rev()
    }

    /// Stable numeric code of this level.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Resolve a numeric code back to its level.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Position of the level inside [`Severity::ALL`].
    pub(crate) fn index(self) -> usize {
        match self {
            Severity::Default => 0,
            Severity::Ok => 1,
            Severity::Info => 2,
            Severity::Warning => 3,
            Severity::Failure => 4,
        }
    }

    /// Color token used when rendering the level.
    pub fn color(self) -> &'static str {
        match self {
            Severity::Default => "default",
            Severity::Ok => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Failure => "danger",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Severity::Default => "Default",
            Severity::Ok => "OK",
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Failure => "Failure",
        }
    }

    /// Lowercase label, matching the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Default => "default",
            Severity::Ok => "ok",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Failure => "failure",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Default => write!(f, "DEFAULT"),
            Severity::Ok => write!(f, "OK"),
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Failure => write!(f, "FAILURE"),
        }
    }
}

impl FromStr for Severity {
    type Err = ResultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.label() == wanted)
            .ok_or_else(|| ResultError::UnknownSeverity(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(Severity::Default < Severity::Ok);
        assert!(Severity::Ok < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Failure);

        let worst: Vec<_> = Severity::worst_first().collect();
        assert_eq!(worst.first(), Some(&Severity::Failure));
        assert_eq!(worst.last(), Some(&Severity::Default));
    }

    #[test]
    fn test_display_metadata() {
        assert_eq!(Severity::Failure.color(), "danger");
        assert_eq!(Severity::Ok.color(), "success");
        assert_eq!(Severity::Ok.description(), "OK");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
    }

    #[test]
    fn test_codes_round_trip_and_index() {
        for (i, level) in Severity::ALL.into_iter().enumerate() {
            assert_eq!(level.index(), i);
            assert_eq!(Severity::from_code(level.code()), Some(level));
        }
        assert_eq!(Severity::from_code(15), None);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(" FAILURE ".parse::<Severity>().unwrap(), Severity::Failure);
        assert!(matches!(
            "critical".parse::<Severity>(),
            Err(ResultError::UnknownSeverity(_))
        ));
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Severity::Ok).unwrap();
        assert_eq!(json, "\"ok\"");

        let level: Severity = serde_json::from_str("\"failure\"").unwrap();
        assert_eq!(level, Severity::Failure);
    }
}
