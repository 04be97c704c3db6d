//! Shared daemon state: config, policy tree, and label allocator.
//!
//! Built once at startup and cloned cheaply into whichever API surface drives
//! it. The policy tree is owned here, there is no global tree.

use std::sync::Arc;

use ciliumd_core::error::Result;
use ciliumd_core::labels::Labels;
use ciliumd_core::policy::{ConsumableDecision, PolicyNode, SearchContext};

use crate::config::DaemonConfig;
use crate::labels::{InMemoryLabelAllocator, LabelAllocator};
use crate::policy::{import, PolicyTree};

#[derive(Clone)]
pub struct Daemon {
    inner: Arc<DaemonInner>,
}

struct DaemonInner {
    cfg: DaemonConfig,
    policy: PolicyTree,
    labels: Arc<dyn LabelAllocator>,
}

impl Daemon {
    /// Build daemon state with a process-local label allocator.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: DaemonConfig) -> Result<Self> {
        let labels = Arc::new(InMemoryLabelAllocator::from_config(&cfg.labels));
        Self::with_allocator(cfg, labels)
    }

    /// Build daemon state around an externally provided allocator.
    pub fn with_allocator(cfg: DaemonConfig, labels: Arc<dyn LabelAllocator>) -> Result<Self> {
        let policy = PolicyTree::new(cfg.policy.root.clone());

        if let Some(file) = &cfg.policy.import {
            let root = import::load_node_from_file(file)?;
            tracing::info!(%file, children = root.children.len(), "imported policy");
            policy.add(policy.prefix(), root)?;
        }

        Ok(Self {
            inner: Arc::new(DaemonInner { cfg, policy, labels }),
        })
    }

    pub fn cfg(&self) -> &DaemonConfig {
        &self.inner.cfg
    }

    pub fn policy(&self) -> &PolicyTree {
        &self.inner.policy
    }

    pub fn policy_add(&self, path: &str, node: PolicyNode) -> Result<()> {
        self.inner.policy.add(path, node)
    }

    pub fn policy_delete(&self, path: &str) -> Result<()> {
        self.inner.policy.delete(path)
    }

    pub fn policy_get(&self, path: &str) -> Result<PolicyNode> {
        self.inner.policy.get(path)
    }

    pub fn policy_can_consume(&self, ctx: &SearchContext) -> ConsumableDecision {
        self.inner.policy.can_consume(ctx)
    }

    /// Identifier for `labels`, allocating one if needed.
    pub async fn get_labels_id(&self, labels: &Labels) -> Result<u32> {
        let res = self.inner.labels.allocate_or_lookup(labels).await;
        if let Err(e) = &res {
            if e.is_capacity_exceeded() {
                tracing::warn!(error = %e, ?labels, "label identifiers exhausted");
            }
        }
        res
    }

    pub async fn get_labels(&self, id: u32) -> Result<Labels> {
        self.inner.labels.resolve(id).await
    }
}
