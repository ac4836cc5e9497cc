//! Human-readable findings collected by static analysis.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Missing-requirement and will-crash messages for one game.
///
/// Messages are deduplicated: a ludeme repeated across the rule tree is
/// reported once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    missing: Vec<String>,
    crashes: Vec<String>,
}

impl Diagnostics {
    /// No findings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a requirement the game does not satisfy.
    pub fn add_missing(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.missing.contains(&message) {
            warn!(%message, "missing requirement");
            self.missing.push(message);
        }
    }

    /// Record a predicted runtime failure.
    pub fn add_crash(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.crashes.contains(&message) {
            warn!(%message, "predicted crash");
            self.crashes.push(message);
        }
    }

    /// Missing-requirement messages in discovery order.
    #[must_use]
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Will-crash messages in discovery order.
    #[must_use]
    pub fn crashes(&self) -> &[String] {
        &self.crashes
    }

    /// Whether any requirement is missing.
    #[must_use]
    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }

    /// Whether any crash is predicted.
    #[must_use]
    pub fn has_crash(&self) -> bool {
        !self.crashes.is_empty()
    }

    /// Missing-requirement report, one message per line.
    #[must_use]
    pub fn missing_report(&self) -> String {
        self.missing.join("\n")
    }

    /// Will-crash report, one message per line.
    #[must_use]
    pub fn crash_report(&self) -> String {
        self.crashes.join("\n")
    }

    /// Fold another set of findings into this one.
    pub fn merge(&mut self, other: Diagnostics) {
        for message in other.missing {
            self.add_missing(message);
        }
        for message in other.crashes {
            self.add_crash(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_deduplicated() {
        let mut report = Diagnostics::new();
        report.add_missing("no tracks");
        report.add_missing("no tracks");
        report.add_crash("division by zero");

        assert_eq!(report.missing().len(), 1);
        assert!(report.has_missing());
        assert!(report.has_crash());
    }

    #[test]
    fn test_reports_join_lines() {
        let mut report = Diagnostics::new();
        report.add_missing("a");
        report.add_missing("b");
        assert_eq!(report.missing_report(), "a\nb");
        assert_eq!(report.crash_report(), "");
    }

    #[test]
    fn test_merge() {
        let mut a = Diagnostics::new();
        a.add_missing("x");
        let mut b = Diagnostics::new();
        b.add_missing("x");
        b.add_crash("y");

        a.merge(b);
        assert_eq!(a.missing(), ["x".to_string()]);
        assert_eq!(a.crashes(), ["y".to_string()]);
    }
}
