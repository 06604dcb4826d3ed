//! Three-state access results and the reducer that combines them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessResult {
    Allow,
    Deny,
    /// No opinion; the decision is left to other checks.
    Abstain,
}

impl AccessResult {
    /// Any `Deny` wins, then any `Allow`; otherwise `Abstain`.
    pub fn combine<I>(results: I) -> AccessResult
    where
        I: IntoIterator<Item = AccessResult>,
    {
        let mut allowed = false;
        for result in results {
            match result {
                AccessResult::Deny => return AccessResult::Deny,
                AccessResult::Allow => allowed = true,
                AccessResult::Abstain => {}
            }
        }
        if allowed {
            AccessResult::Allow
        } else {
            AccessResult::Abstain
        }
    }

    pub fn and(self, other: AccessResult) -> AccessResult {
        AccessResult::combine([self, other])
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessResult::Allow)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessResult::Allow => "allow",
            AccessResult::Deny => "deny",
            AccessResult::Abstain => "abstain",
        }
    }
}

impl fmt::Display for AccessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an evaluator reports when none of the user's prefixes match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchPolicy {
    Abstain,
    #[default]
    Deny,
}

impl NoMatchPolicy {
    pub fn result(&self) -> AccessResult {
        match self {
            NoMatchPolicy::Abstain => AccessResult::Abstain,
            NoMatchPolicy::Deny => AccessResult::Deny,
        }
    }
}

/// How a combined `Abstain` is turned into a final yes/no.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultPosture {
    #[default]
    Deny,
    Allow,
}

impl DefaultPosture {
    pub fn grants(&self, result: AccessResult) -> bool {
        match result {
            AccessResult::Allow => true,
            AccessResult::Deny => false,
            AccessResult::Abstain => matches!(self, DefaultPosture::Allow),
        }
    }
}
