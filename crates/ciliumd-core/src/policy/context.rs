use serde::{Deserialize, Serialize};

use crate::labels::Labels;

/// Identity pair being classified: may `from` consume `to`?
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchContext {
    /// Consumer identity labels.
    #[serde(default)]
    pub from: Labels,
    /// Target identity labels.
    #[serde(default)]
    pub to: Labels,
}

impl SearchContext {
    pub fn new(from: Labels, to: Labels) -> Self {
        Self { from, to }
    }
}
