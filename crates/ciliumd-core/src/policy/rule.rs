//! Rule capability and the concrete rule kinds a node can carry.

use serde::{Deserialize, Serialize};

use super::context::SearchContext;
use super::decision::ConsumableDecision;
use crate::labels::Label;

/// Capability the decision engine needs from anything that holds rules.
pub trait Rule {
    /// Whether this rule's scope applies to the context at all.
    fn covers(&self, ctx: &SearchContext) -> bool;
    /// Own verdict for the context, independent of any children.
    fn allows(&self, ctx: &SearchContext) -> ConsumableDecision;
}

/// One allow-list entry: consumers carrying `label` get `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllowRule {
    #[serde(default = "default_action")]
    pub action: ConsumableDecision,
    pub label: Label,
}

fn default_action() -> ConsumableDecision {
    ConsumableDecision::Accept
}

impl AllowRule {
    pub fn new(action: ConsumableDecision, label: Label) -> Self {
        Self { action, label }
    }
}

/// Which consumers may reach targets selected by `coverage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsumersRule {
    #[serde(default)]
    pub coverage: Vec<Label>,
    #[serde(default)]
    pub allow: Vec<AllowRule>,
}

impl Rule for ConsumersRule {
    fn covers(&self, ctx: &SearchContext) -> bool {
        ctx.to.matches_all(&self.coverage)
    }

    fn allows(&self, ctx: &SearchContext) -> ConsumableDecision {
        self.allow
            .iter()
            .filter(|a| a.label.matches(&ctx.from))
            .fold(ConsumableDecision::Undecided, |acc, a| acc.combine(a.action))
    }
}

/// Consumers of targets selected by `coverage` must carry every label in
/// `requires`, otherwise they are denied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequiresRule {
    #[serde(default)]
    pub coverage: Vec<Label>,
    pub requires: Vec<Label>,
}

impl Rule for RequiresRule {
    fn covers(&self, ctx: &SearchContext) -> bool {
        ctx.to.matches_all(&self.coverage)
    }

    fn allows(&self, ctx: &SearchContext) -> ConsumableDecision {
        if ctx.from.matches_all(&self.requires) {
            ConsumableDecision::Undecided
        } else {
            ConsumableDecision::Deny
        }
    }
}

/// Rule attached to a policy node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyRule {
    Consumers(ConsumersRule),
    Requires(RequiresRule),
}

impl Rule for PolicyRule {
    fn covers(&self, ctx: &SearchContext) -> bool {
        match self {
            PolicyRule::Consumers(r) => r.covers(ctx),
            PolicyRule::Requires(r) => r.covers(ctx),
        }
    }

    fn allows(&self, ctx: &SearchContext) -> ConsumableDecision {
        match self {
            PolicyRule::Consumers(r) => r.allows(ctx),
            PolicyRule::Requires(r) => r.allows(ctx),
        }
    }
}
