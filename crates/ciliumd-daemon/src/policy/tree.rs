//! Process-wide policy tree and its mutation API.
//!
//! Readers (decisions, get) share a read guard and run in parallel. Each
//! mutation resolves and applies under a single write guard, so a reader sees
//! either the old child or the new one. Failed mutations leave the tree as is.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ciliumd_core::error::{CiliumError, Result};
use ciliumd_core::policy::{self, ConsumableDecision, PolicyNode, SearchContext};

use super::path;

/// Deepest level a node may sit at below the root.
pub const MAX_POLICY_DEPTH: usize = 64;

fn check_depth(depth: usize, path: &str) -> Result<()> {
    if depth > MAX_POLICY_DEPTH {
        return Err(CiliumError::BadRequest(format!(
            "policy at {path:?} would reach depth {depth}, limit is {MAX_POLICY_DEPTH}"
        )));
    }
    Ok(())
}

pub struct PolicyTree {
    prefix: String,
    root: RwLock<PolicyNode>,
}

impl PolicyTree {
    /// Empty tree rooted at `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            root: RwLock::new(PolicyNode::default()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Place `node` at `path`, replacing whatever was there.
    ///
    /// The root path swaps the whole tree. Otherwise the parent path must
    /// already exist and `node` becomes the child named by the last segment.
    /// No node may end up more than [`MAX_POLICY_DEPTH`] segments below the
    /// root.
    pub fn add(&self, path: &str, mut node: PolicyNode) -> Result<()> {
        tracing::debug!(
            %path,
            name = %node.name,
            children = node.children.len(),
            "policy add request"
        );

        let segments = path::segments(&self.prefix, path)?;
        let depth = segments.len() + node.height() - 1;
        let mut root = self.write()?;

        let Some((last, parents)) = segments.split_last() else {
            check_depth(depth, path)?;
            node.normalize()?;
            *root = node;
            return Ok(());
        };

        let parent = path::walk_mut(&mut *root, parents, path)?;
        check_depth(depth, path)?;
        node.normalize()?;
        if node.name.is_empty() {
            node.name = last.to_string();
        } else if node.name != *last {
            return Err(CiliumError::NameMismatch {
                name: node.name,
                segment: last.to_string(),
            });
        }

        parent.children.insert(node.name.clone(), node);
        Ok(())
    }

    /// Remove the node at `path`. Deleting the root resets it to an empty node.
    pub fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!(%path, "policy delete request");

        let segments = path::segments(&self.prefix, path)?;
        let mut root = self.write()?;

        let Some((last, parents)) = segments.split_last() else {
            *root = PolicyNode::default();
            return Ok(());
        };

        let parent = path::walk_mut(&mut *root, parents, path)?;
        match parent.children.remove(*last) {
            Some(_) => Ok(()),
            None => Err(path::missing_child(last, &parent.name, path)),
        }
    }

    /// Snapshot of the node at `path`.
    pub fn get(&self, path: &str) -> Result<PolicyNode> {
        tracing::debug!(%path, "policy get request");

        let root = self.read()?;
        let (node, _) = path::find_node(&*root, &self.prefix, path)?;
        Ok(node.clone())
    }

    /// `Accept` or `Deny` for `ctx` against the current tree.
    pub fn can_consume(&self, ctx: &SearchContext) -> ConsumableDecision {
        // A poisoned tree fails closed.
        let Ok(root) = self.read() else {
            return ConsumableDecision::Deny;
        };
        let decision = policy::policy_can_consume(&root, ctx);
        tracing::debug!(%decision, from = ?ctx.from, to = ?ctx.to, "policy decision");
        decision
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, PolicyNode>> {
        self.root.read().map_err(|_| {
            tracing::warn!(prefix = %self.prefix, "policy tree lock poisoned");
            CiliumError::Internal("policy tree lock poisoned".into())
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, PolicyNode>> {
        self.root.write().map_err(|_| {
            tracing::warn!(prefix = %self.prefix, "policy tree lock poisoned");
            CiliumError::Internal("policy tree lock poisoned".into())
        })
    }
}
