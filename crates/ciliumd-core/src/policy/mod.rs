//! Policy model and decision engine.
//!
//! Nodes form a tree; each node carries its own rules and owns its children.
//! The engine walks a tree read-only and combines per-node verdicts by
//! precedence:
//! - an explicit `DENY` anywhere on the evaluated path wins,
//! - `ALWAYS_ACCEPT` stops the descent but is reported as `ACCEPT`,
//! - otherwise any `ACCEPT` accepts and no match at all denies.

pub mod context;
pub mod decision;
pub mod engine;
pub mod node;
pub mod rule;

pub use context::SearchContext;
pub use decision::ConsumableDecision;
pub use engine::policy_can_consume;
pub use node::PolicyNode;
pub use rule::{AllowRule, ConsumersRule, PolicyRule, RequiresRule, Rule};
