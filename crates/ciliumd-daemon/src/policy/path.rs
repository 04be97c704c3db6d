//! Dotted policy path resolution.
//!
//! `<prefix>.foo.bar` addresses `bar` under `foo` under the root; the bare
//! prefix addresses the root. Empty segments are skipped. Lookup fails at the
//! first missing segment and never falls back.

use ciliumd_core::error::{CiliumError, Result};
use ciliumd_core::policy::PolicyNode;

/// Strip `prefix` from `path` and split the remainder into child names.
///
/// The prefix has to end on a segment boundary, so `io.ciliumx` is not under
/// `io.cilium`.
pub fn segments<'p>(prefix: &str, path: &'p str) -> Result<Vec<&'p str>> {
    let rest = path
        .strip_prefix(prefix)
        .filter(|rest| rest.is_empty() || rest.starts_with('.'))
        .ok_or_else(|| CiliumError::InvalidPrefix {
            path: path.to_string(),
            prefix: prefix.to_string(),
        })?;
    Ok(rest.split('.').filter(|s| !s.is_empty()).collect())
}

/// Node at `path` and its direct parent (`None` iff `path` is the root).
pub fn find_node<'t>(
    root: &'t PolicyNode,
    prefix: &str,
    path: &str,
) -> Result<(&'t PolicyNode, Option<&'t PolicyNode>)> {
    let mut current = root;
    let mut parent = None;

    for segment in segments(prefix, path)? {
        let child = current
            .children
            .get(segment)
            .ok_or_else(|| missing_child(segment, &current.name, path))?;
        parent = Some(current);
        current = child;
    }

    Ok((current, parent))
}

/// Mutable walk along already-split `segments`, used by the mutation API.
pub(crate) fn walk_mut<'t>(
    root: &'t mut PolicyNode,
    segments: &[&str],
    path: &str,
) -> Result<&'t mut PolicyNode> {
    let mut current = root;
    for segment in segments {
        let PolicyNode { name, children, .. } = current;
        current = match children.get_mut(*segment) {
            Some(child) => child,
            None => return Err(missing_child(segment, name, path)),
        };
    }
    Ok(current)
}

pub(crate) fn missing_child(segment: &str, node: &str, path: &str) -> CiliumError {
    CiliumError::MissingChild {
        segment: segment.to_string(),
        node: node.to_string(),
        path: path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const PREFIX: &str = "io.cilium";

    fn tree() -> PolicyNode {
        PolicyNode::new("root").with_child(PolicyNode::new("foo").with_child(PolicyNode::new("bar")))
    }

    #[test]
    fn bare_prefix_is_root() {
        let root = tree();
        let (node, parent) = find_node(&root, PREFIX, "io.cilium").unwrap();
        assert_eq!(node.name, "root");
        assert!(parent.is_none());
    }

    #[test]
    fn walks_children_and_reports_parent() {
        let root = tree();
        let (node, parent) = find_node(&root, PREFIX, "io.cilium.foo.bar").unwrap();
        assert_eq!(node.name, "bar");
        assert_eq!(parent.unwrap().name, "foo");
    }

    #[test]
    fn empty_segments_are_skipped() {
        let root = tree();
        let (node, _) = find_node(&root, PREFIX, "io.cilium..foo..bar.").unwrap();
        assert_eq!(node.name, "bar");
        assert_eq!(segments(PREFIX, "io.cilium.").unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn wrong_prefix_is_rejected() {
        let root = tree();
        for path in ["", "io", "org.cilium.foo", "cilium.io", "io.ciliumfoo"] {
            let err = find_node(&root, PREFIX, path).unwrap_err();
            assert!(
                matches!(err, CiliumError::InvalidPrefix { .. }),
                "path={path:?} err={err}"
            );
        }
    }

    #[test]
    fn first_missing_segment_is_named() {
        let root = tree();
        let err = find_node(&root, PREFIX, "io.cilium.foo.baz.qux").unwrap_err();
        assert_eq!(
            err,
            CiliumError::MissingChild {
                segment: "baz".into(),
                node: "foo".into(),
                path: "io.cilium.foo.baz.qux".into(),
            }
        );
    }

    #[test]
    fn walk_mut_reaches_same_node() {
        let mut root = tree();
        let node = walk_mut(&mut root, &["foo", "bar"], "io.cilium.foo.bar").unwrap();
        node.coverage.push(ciliumd_core::labels::Label::new("app", "db"));
        assert_eq!(root.children["foo"].children["bar"].coverage.len(), 1);

        let err = walk_mut(&mut root, &["nope"], "io.cilium.nope").unwrap_err();
        assert!(matches!(err, CiliumError::MissingChild { .. }));
    }
}
