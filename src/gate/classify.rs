//! Intent classification by ordered keyword rules.
//!
//! Rules are checked top to bottom against the upper-cased text and the
//! first match wins. Anything that matches no rule is a status report.

use serde::{Deserialize, Serialize};

/// Inferred intent of a transmission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Asks for something (`?`).
    Request,
    /// Alarm or distress.
    Urgent,
    /// Route and joint-action chatter.
    Coordination,
    /// Everything else.
    Status,
}

/// One row of the classification table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassifierRule {
    pub kind: MessageType,
    /// Upper-case substrings, any of which selects `kind`.
    pub markers: &'static [&'static str],
}

impl ClassifierRule {
    /// Does `upper` (already upper-cased) contain any marker?
    #[must_use]
    pub fn matches(&self, upper: &str) -> bool {
        self.markers.iter().any(|m| upper.contains(m))
    }
}

/// Default rule table.
pub const DEFAULT_RULES: [ClassifierRule; 3] = [
    ClassifierRule {
        kind: MessageType::Request,
        markers: &["?"],
    },
    ClassifierRule {
        kind: MessageType::Urgent,
        markers: &["!", "‼", "URGENT", "SOS", "HELP", "MAYDAY"],
    },
    ClassifierRule {
        kind: MessageType::Coordination,
        markers: &["RTE", "EVAC", "CLEAR", "BLOCK", "COORD", "SHARE", "SYNC"],
    },
];

/// First-match classifier over a rule table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classifier {
    rules: &'static [ClassifierRule],
}

impl Default for Classifier {
    fn default() -> Self {
        Self { rules: &DEFAULT_RULES }
    }
}

impl Classifier {
    /// Classifier over a custom table.
    #[must_use]
    pub const fn with_rules(rules: &'static [ClassifierRule]) -> Self {
        Self { rules }
    }

    /// Classify free text. Case-insensitive.
    #[must_use]
    pub fn classify(&self, text: &str) -> MessageType {
        let upper = text.to_uppercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&upper))
            .map_or(MessageType::Status, |rule| rule.kind)
    }
}
