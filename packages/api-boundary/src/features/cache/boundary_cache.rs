//! Per-archive boundary cache with atomic compute-if-absent

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use prometheus::Registry;

use super::metrics::BoundaryCacheMetrics;
use crate::errors::Result;
use crate::features::boundary::ApiBoundary;
use crate::shared::models::Archive;

type Slot = Arc<OnceCell<Arc<dyn ApiBoundary>>>;

/// One boundary per archive name, computed at most once.
///
/// The map lock is held only to fetch or insert the archive's slot. The
/// computation runs inside the slot's `OnceCell`, so racing callers for the
/// same archive block until the first one publishes its boundary while other
/// archives proceed in parallel. A failed computation leaves the slot empty.
pub struct BoundaryCache {
    slots: Mutex<HashMap<String, Slot>>,
    metrics: Arc<BoundaryCacheMetrics>,
}

impl BoundaryCache {
    pub fn new(registry: &Registry) -> Result<Self> {
        Ok(Self {
            slots: Mutex::new(HashMap::new()),
            metrics: Arc::new(BoundaryCacheMetrics::new(registry)?),
        })
    }

    /// Stored boundary of `archive`, or the result of `compute` stored once
    pub fn boundary_for<F>(&self, archive: &Archive, compute: F) -> Result<Arc<dyn ApiBoundary>>
    where
        F: FnOnce() -> Result<Arc<dyn ApiBoundary>>,
    {
        archive.ensure_named()?;

        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(archive.name().to_string()).or_default())
        };

        if let Some(boundary) = slot.get() {
            self.metrics.hits.inc();
            return Ok(Arc::clone(boundary));
        }

        // callers that waited on another thread's computation count as hits
        let mut computed = false;
        let boundary = slot.get_or_try_init(|| {
            computed = true;
            self.metrics.misses.inc();
            self.metrics.computations.inc();
            tracing::debug!(archive = %archive.name(), "Computing API boundary");
            let boundary = compute()?;
            self.metrics.archives.inc();
            Ok::<_, crate::errors::BoundaryError>(boundary)
        })?;
        if !computed {
            self.metrics.hits.inc();
        }
        Ok(Arc::clone(boundary))
    }

    /// Already computed boundary, without computing
    pub fn get(&self, archive_name: &str) -> Option<Arc<dyn ApiBoundary>> {
        let slots = self.slots.lock();
        slots.get(archive_name).and_then(|slot| slot.get().cloned())
    }

    /// Number of archives with a published boundary
    pub fn len(&self) -> usize {
        self.slots.lock().values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metrics(&self) -> &BoundaryCacheMetrics {
        &self.metrics
    }
}

impl std::fmt::Debug for BoundaryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryCache")
            .field("archives", &self.len())
            .finish()
    }
}
