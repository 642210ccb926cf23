//! Configuration options for the resolution engine.
//!
//! Options are carried by each [`crate::ParamGen`] instance; there is no
//! process-wide state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which branch wins when several sibling guards are true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// The first true guard in document order wins; later guards are not evaluated
    First,

    /// The last true guard in document order wins
    Last,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        MatchPolicy::Last
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::First => f.write_str("first"),
            MatchPolicy::Last => f.write_str("last"),
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(MatchPolicy::First),
            "last" => Ok(MatchPolicy::Last),
            other => Err(format!(
                "unknown match policy '{}', expected 'first' or 'last'",
                other
            )),
        }
    }
}

/// Configuration options for a resolution engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamGenConfig {
    /// How conflicting true guards are resolved. Default: Last
    pub match_policy: MatchPolicy,
}

impl Default for ParamGenConfig {
    fn default() -> Self {
        Self {
            match_policy: MatchPolicy::default(),
        }
    }
}

impl ParamGenConfig {
    /// Create a configuration with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the match policy
    pub fn with_match_policy(mut self, match_policy: MatchPolicy) -> Self {
        self.match_policy = match_policy;
        self
    }
}
