//! Process-wide memoization of composed pipelines.

use crate::composer::{CompiledPipeline, PipelineComposer};
use crs_common::{CrsId, TransResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Memoizes compiled pipelines keyed by the ordered (source, destination)
/// pair.
///
/// The cache follows the strict policy: one lock around the whole
/// check-and-insert, so a composition runs at most once per ordered pair
/// even under concurrent first-time requests. Compositions are rare and the
/// key space is bounded by the squared catalog size, so holding the lock
/// while the engine builds stages is acceptable. Entries are never evicted,
/// and a failed composition leaves the map untouched.
///
/// (A,B) and (B,A) are independent entries; an inverse pipeline is never
/// derived from its counterpart.
pub struct PipelineCache {
    composer: PipelineComposer,
    pipelines: Mutex<HashMap<(CrsId, CrsId), Arc<CompiledPipeline>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PipelineCache {
    pub fn new(composer: PipelineComposer) -> Self {
        Self {
            composer,
            pipelines: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Fetch the pipeline for an ordered pair, composing it on first use.
    ///
    /// Repeated calls with the same (case-insensitive) pair return clones of
    /// the same `Arc`, so callers observe reference-stable reuse.
    pub fn create(&self, src: &str, dst: &str) -> TransResult<Arc<CompiledPipeline>> {
        let src = CrsId::new(src);
        let dst = CrsId::new(dst);
        let key = (src.clone(), dst.clone());

        // A panicked composition poisons the lock but cannot corrupt the
        // map: entries are inserted only after a composition succeeds and
        // are never mutated. Recover and keep serving.
        let mut pipelines = self
            .pipelines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(pipeline) = pipelines.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(pipeline));
        }

        // Miss: compose under the lock (strict at-most-once construction).
        let pipeline = Arc::new(self.composer.compose(&src, &dst)?);
        pipelines.insert(key, Arc::clone(&pipeline));
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(pipeline)
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self
            .pipelines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len();
        CacheStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
