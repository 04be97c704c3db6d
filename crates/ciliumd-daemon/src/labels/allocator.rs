use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;

use ciliumd_core::error::{CiliumError, Result};
use ciliumd_core::labels::Labels;

use crate::config::LabelsSection;

/// Maps label sets to small sequential identifiers and back.
///
/// Implementations backed by a distributed store plug in here; the daemon only
/// depends on this contract.
#[async_trait]
pub trait LabelAllocator: Send + Sync {
    /// Id of `labels`, allocating the next free one on first sight.
    ///
    /// Equal label sets always get the same id. Fails with
    /// `CiliumError::CapacityExceeded` once the id space is exhausted.
    async fn allocate_or_lookup(&self, labels: &Labels) -> Result<u32>;

    /// Exact label set registered under `id`.
    async fn resolve(&self, id: u32) -> Result<Labels>;
}

/// Process-local allocator.
///
/// Lookups go straight to the concurrent maps; allocations serialize on the
/// last-free-id counter so two callers never mint ids for the same set.
pub struct InMemoryLabelAllocator {
    by_labels: DashMap<Labels, u32>,
    by_id: DashMap<u32, Labels>,
    last_free_id: Mutex<u32>,
    max: u32,
}

impl InMemoryLabelAllocator {
    pub fn new(first_free_id: u32, max: u32) -> Self {
        Self {
            by_labels: DashMap::new(),
            by_id: DashMap::new(),
            last_free_id: Mutex::new(first_free_id),
            max,
        }
    }

    pub fn from_config(cfg: &LabelsSection) -> Self {
        Self::new(cfg.first_free_id, cfg.max_set_of_labels)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[async_trait]
impl LabelAllocator for InMemoryLabelAllocator {
    async fn allocate_or_lookup(&self, labels: &Labels) -> Result<u32> {
        if let Some(id) = self.by_labels.get(labels) {
            return Ok(*id);
        }

        let mut next = self
            .last_free_id
            .lock()
            .map_err(|_| CiliumError::Internal("label allocator lock poisoned".into()))?;

        // Lost the race to another allocation of the same set.
        if let Some(id) = self.by_labels.get(labels) {
            return Ok(*id);
        }
        if *next >= self.max {
            return Err(CiliumError::CapacityExceeded { max: self.max });
        }

        let id = *next;
        *next += 1;
        self.by_id.insert(id, labels.clone());
        self.by_labels.insert(labels.clone(), id);
        tracing::debug!(id, ?labels, "allocated labels id");
        Ok(id)
    }

    async fn resolve(&self, id: u32) -> Result<Labels> {
        self.by_id
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(CiliumError::UnknownLabelsId(id))
    }
}
