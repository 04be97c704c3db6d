use std::fmt;

use serde::{Deserialize, Serialize};

/// Verdict of a rule, node, or subtree.
///
/// Variants are declared in precedence order so `Ord`/`max` combine them:
/// `Undecided < Accept < AlwaysAccept < Deny`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumableDecision {
    /// No matching rule at this scope.
    #[default]
    Undecided,
    Accept,
    /// Accept and stop looking at more specific scopes.
    AlwaysAccept,
    /// Explicit deny; dominates everything else.
    Deny,
}

impl ConsumableDecision {
    /// Higher-precedence of the two.
    pub fn combine(self, other: Self) -> Self {
        self.max(other)
    }

    /// Boundary form: only `Accept` or `Deny` leave the engine.
    pub fn normalize(self) -> Self {
        match self {
            ConsumableDecision::AlwaysAccept | ConsumableDecision::Accept => {
                ConsumableDecision::Accept
            }
            ConsumableDecision::Undecided | ConsumableDecision::Deny => ConsumableDecision::Deny,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConsumableDecision::Undecided => "UNDECIDED",
            ConsumableDecision::Accept => "ACCEPT",
            ConsumableDecision::AlwaysAccept => "ALWAYS_ACCEPT",
            ConsumableDecision::Deny => "DENY",
        }
    }
}

impl fmt::Display for ConsumableDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
