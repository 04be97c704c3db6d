//! Consume decision over a policy tree.
//!
//! The walk is read-only and total: it never fails and never mutates.

use super::context::SearchContext;
use super::decision::ConsumableDecision;
use super::node::PolicyNode;
use super::rule::Rule;

/// Decide whether `ctx.from` may consume `ctx.to` under `root`.
///
/// Only `Accept` or `Deny` is returned. An explicit verdict on the root itself
/// is final; otherwise the children are combined and a tree with no matching
/// rule denies.
pub fn policy_can_consume(root: &PolicyNode, ctx: &SearchContext) -> ConsumableDecision {
    match root.allows(ctx) {
        ConsumableDecision::Deny => return ConsumableDecision::Deny,
        ConsumableDecision::AlwaysAccept => return ConsumableDecision::Accept,
        ConsumableDecision::Accept | ConsumableDecision::Undecided => {}
    }

    let decision = can_consume(root, ctx);
    tracing::trace!(node = %root.name, %decision, "subtree decision");
    decision.normalize()
}

/// Combine the children of `node` that cover `ctx`.
///
/// Pass 1 looks at each covering child's own rules, pass 2 descends into them.
/// `Deny` returns at once from either pass. `AlwaysAccept` still lets the rest
/// of its pass run so a sibling `Deny` wins regardless of iteration order, then
/// skips any deeper scope. `Undecided` is passed upward as is.
fn can_consume(node: &PolicyNode, ctx: &SearchContext) -> ConsumableDecision {
    let mut decision = ConsumableDecision::Undecided;

    for child in covering(node, ctx) {
        decision = decision.combine(child.allows(ctx));
        if decision == ConsumableDecision::Deny {
            return decision;
        }
    }
    if decision == ConsumableDecision::AlwaysAccept {
        return decision;
    }

    for child in covering(node, ctx) {
        decision = decision.combine(can_consume(child, ctx));
        if decision == ConsumableDecision::Deny {
            return decision;
        }
    }

    decision
}

fn covering<'a>(
    node: &'a PolicyNode,
    ctx: &'a SearchContext,
) -> impl Iterator<Item = &'a PolicyNode> + 'a {
    node.children.values().filter(move |c| c.covers(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{Label, Labels};
    use crate::policy::rule::{AllowRule, ConsumersRule, PolicyRule};

    /// Node whose single rule renders `action` for every consumer.
    fn verdict(name: &str, action: ConsumableDecision) -> PolicyNode {
        PolicyNode::new(name).with_rule(PolicyRule::Consumers(ConsumersRule {
            coverage: vec![],
            allow: vec![AllowRule::new(action, Label::new("id", ""))],
        }))
    }

    fn ctx() -> SearchContext {
        SearchContext::new(
            [("id", "client")].into_iter().collect::<Labels>(),
            [("id", "server")].into_iter().collect::<Labels>(),
        )
    }

    #[test]
    fn single_accepting_child_accepts() {
        let root = PolicyNode::default().with_child(verdict("a", ConsumableDecision::Accept));
        assert_eq!(policy_can_consume(&root, &ctx()), ConsumableDecision::Accept);
    }

    #[test]
    fn sibling_deny_wins_over_accept() {
        let root = PolicyNode::default()
            .with_child(verdict("a", ConsumableDecision::Accept))
            .with_child(verdict("b", ConsumableDecision::Deny));
        assert_eq!(policy_can_consume(&root, &ctx()), ConsumableDecision::Deny);
    }

    #[test]
    fn root_deny_ignores_children() {
        let root = verdict("", ConsumableDecision::Deny)
            .with_child(verdict("a", ConsumableDecision::AlwaysAccept));
        assert_eq!(policy_can_consume(&root, &ctx()), ConsumableDecision::Deny);
    }

    #[test]
    fn root_always_accept_is_normalized() {
        let root = verdict("", ConsumableDecision::AlwaysAccept)
            .with_child(verdict("a", ConsumableDecision::Deny));
        assert_eq!(policy_can_consume(&root, &ctx()), ConsumableDecision::Accept);
    }

    #[test]
    fn root_accept_alone_still_denies_without_matching_children() {
        let root = verdict("", ConsumableDecision::Accept);
        assert_eq!(policy_can_consume(&root, &ctx()), ConsumableDecision::Deny);
    }

    #[test]
    fn always_accept_skips_deeper_deny() {
        let a = verdict("a", ConsumableDecision::AlwaysAccept)
            .with_child(verdict("inner", ConsumableDecision::Deny));
        let root = PolicyNode::default().with_child(a);
        assert_eq!(policy_can_consume(&root, &ctx()), ConsumableDecision::Accept);
    }

    #[test]
    fn always_accept_does_not_hide_sibling_deny() {
        // "a" sorts before "b"; the deny must still be seen.
        let root = PolicyNode::default()
            .with_child(verdict("a", ConsumableDecision::AlwaysAccept))
            .with_child(verdict("b", ConsumableDecision::Deny));
        assert_eq!(policy_can_consume(&root, &ctx()), ConsumableDecision::Deny);
    }

    #[test]
    fn always_accept_in_one_subtree_does_not_hide_deny_in_another() {
        for (first, second) in [
            (ConsumableDecision::AlwaysAccept, ConsumableDecision::Deny),
            (ConsumableDecision::Deny, ConsumableDecision::AlwaysAccept),
        ] {
            let root = PolicyNode::default()
                .with_child(PolicyNode::new("a").with_child(verdict("child", first)))
                .with_child(PolicyNode::new("b").with_child(verdict("child", second)));
            assert_eq!(
                policy_can_consume(&root, &ctx()),
                ConsumableDecision::Deny,
                "a={first} b={second}"
            );
        }
    }

    #[test]
    fn always_accept_subtree_beside_undecided_sibling_accepts() {
        let a = PolicyNode::new("a").with_child(verdict("child", ConsumableDecision::AlwaysAccept));
        let b = PolicyNode::new("b").with_child(PolicyNode::new("child"));
        let root = PolicyNode::default().with_child(a).with_child(b);
        assert_eq!(policy_can_consume(&root, &ctx()), ConsumableDecision::Accept);
    }

    #[test]
    fn deep_deny_under_accepting_parent_denies() {
        let a = verdict("a", ConsumableDecision::Accept)
            .with_child(verdict("inner", ConsumableDecision::Deny));
        let root = PolicyNode::default().with_child(a);
        assert_eq!(policy_can_consume(&root, &ctx()), ConsumableDecision::Deny);
    }

    #[test]
    fn uncovered_children_contribute_nothing() {
        let hidden = verdict("a", ConsumableDecision::Deny)
            .with_coverage(vec![Label::new("id", "elsewhere")]);
        let root = PolicyNode::default()
            .with_child(hidden)
            .with_child(verdict("b", ConsumableDecision::Accept));
        assert_eq!(policy_can_consume(&root, &ctx()), ConsumableDecision::Accept);
    }

    #[test]
    fn empty_tree_denies() {
        assert_eq!(
            policy_can_consume(&PolicyNode::default(), &ctx()),
            ConsumableDecision::Deny
        );
    }
}
