//! Policy tree node.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::context::SearchContext;
use super::decision::ConsumableDecision;
use super::rule::{PolicyRule, Rule};
use crate::error::{CiliumError, Result};
use crate::labels::Label;

/// Named node owning its rules and children.
///
/// `children` keys always equal the child's `name`; see [`PolicyNode::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyNode {
    #[serde(default)]
    pub name: String,
    /// Targets (`ctx.to`) this node applies to. Empty covers everything.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coverage: Vec<Label>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<PolicyRule>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, PolicyNode>,
}

impl PolicyNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_coverage(mut self, coverage: Vec<Label>) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_rule(mut self, rule: PolicyRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Insert `child` under its own name, replacing any sibling of that name.
    pub fn with_child(mut self, child: PolicyNode) -> Self {
        self.children.insert(child.name.clone(), child);
        self
    }

    /// Levels in this subtree, the node itself included.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            height = height.max(level);
            stack.extend(node.children.values().map(|c| (c, level + 1)));
        }
        height
    }

    /// Enforce the children key/name invariant over the whole subtree.
    ///
    /// Unnamed children adopt their key; a child whose name differs from its
    /// key is rejected.
    pub fn normalize(&mut self) -> Result<()> {
        for (key, child) in self.children.iter_mut() {
            if child.name.is_empty() {
                child.name = key.clone();
            } else if child.name != *key {
                return Err(CiliumError::NameMismatch {
                    name: child.name.clone(),
                    segment: key.clone(),
                });
            }
            child.normalize()?;
        }
        Ok(())
    }
}

impl Rule for PolicyNode {
    fn covers(&self, ctx: &SearchContext) -> bool {
        ctx.to.matches_all(&self.coverage)
    }

    fn allows(&self, ctx: &SearchContext) -> ConsumableDecision {
        let mut decision = ConsumableDecision::Undecided;
        for rule in self.rules.iter().filter(|r| r.covers(ctx)) {
            decision = decision.combine(rule.allows(ctx));
            if decision == ConsumableDecision::Deny {
                break;
            }
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::labels::Labels;
    use crate::policy::rule::{AllowRule, ConsumersRule, RequiresRule};

    #[test]
    fn allows_ignores_rules_that_do_not_cover() {
        let node = PolicyNode::new("db")
            .with_rule(PolicyRule::Requires(RequiresRule {
                coverage: vec![Label::new("app", "other")],
                requires: vec![Label::new("never", "")],
            }))
            .with_rule(PolicyRule::Consumers(ConsumersRule {
                coverage: vec![],
                allow: vec![AllowRule::new(
                    ConsumableDecision::Accept,
                    Label::new("app", "web"),
                )],
            }));

        let ctx = SearchContext::new(
            [("app", "web")].into_iter().collect::<Labels>(),
            [("app", "db")].into_iter().collect::<Labels>(),
        );
        assert_eq!(node.allows(&ctx), ConsumableDecision::Accept);
    }

    #[test]
    fn node_without_rules_is_undecided() {
        let ctx = SearchContext::default();
        let node = PolicyNode::new("empty");
        assert!(node.covers(&ctx));
        assert_eq!(node.allows(&ctx), ConsumableDecision::Undecided);
    }

    #[test]
    fn normalize_names_children_from_keys() {
        let mut root = PolicyNode::default();
        let mut foo = PolicyNode::default();
        foo.children.insert("bar".into(), PolicyNode::default());
        root.children.insert("foo".into(), foo);

        root.normalize().unwrap();
        assert_eq!(root.children["foo"].name, "foo");
        assert_eq!(root.children["foo"].children["bar"].name, "bar");
    }

    #[test]
    fn normalize_rejects_conflicting_names() {
        let mut root = PolicyNode::default();
        root.children.insert("foo".into(), PolicyNode::new("bar"));
        let err = root.normalize().unwrap_err();
        assert_eq!(
            err,
            CiliumError::NameMismatch {
                name: "bar".into(),
                segment: "foo".into()
            }
        );
    }

    #[test]
    fn height_counts_the_longest_branch() {
        assert_eq!(PolicyNode::default().height(), 1);
        let root = PolicyNode::default()
            .with_child(PolicyNode::new("a"))
            .with_child(PolicyNode::new("b").with_child(PolicyNode::new("c")));
        assert_eq!(root.height(), 3);
    }

    #[test]
    fn decision_survives_json_round_trip_with_equals_in_keys() {
        let node = PolicyNode::new("db")
            .with_coverage(vec![Label::new("//=/", "")])
            .with_rule(PolicyRule::Consumers(ConsumersRule {
                coverage: vec![],
                allow: vec![AllowRule::new(
                    ConsumableDecision::Accept,
                    Label::new("foo==", "=="),
                )],
            }));
        let ctx = SearchContext::new(
            [("foo==", "==")].into_iter().collect::<Labels>(),
            [("//=/", "")].into_iter().collect::<Labels>(),
        );

        let back: PolicyNode =
            serde_json::from_str(&serde_json::to_string(&node).unwrap()).unwrap();
        assert_eq!(back, node);
        assert!(back.covers(&ctx));
        assert_eq!(back.allows(&ctx), ConsumableDecision::Accept);
    }
}
