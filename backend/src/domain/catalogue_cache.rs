//! Versioned cache for the public course catalogue.
//!
//! Writers bump the version after any change that alters what the public
//! list would show. Readers compare the cached snapshot's version with the
//! current one and reload when they differ.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::debug;

use super::CourseListing;

#[derive(Debug)]
struct Snapshot {
    version: u64,
    listings: Arc<Vec<CourseListing>>,
}

/// Public catalogue cache with an explicit invalidation counter.
#[derive(Debug, Default)]
pub struct CatalogueCache {
    version: AtomicU64,
    snapshot: RwLock<Option<Snapshot>>,
}

impl CatalogueCache {
    /// Empty cache at version zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version counter.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Mark the cached list stale.
    pub fn invalidate(&self) {
        let previous = self.version.fetch_add(1, Ordering::AcqRel);
        debug!(version = previous.wrapping_add(1), "catalogue cache invalidated");
    }

    /// Return the cached list, reloading it with `load` when stale.
    ///
    /// The snapshot is tagged with the version observed before loading, so a
    /// write racing with the load leaves it stale for the next reader.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<Arc<Vec<CourseListing>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<CourseListing>, E>>,
    {
        let observed = self.version();
        if let Some(listings) = self.fresh(observed).await {
            return Ok(listings);
        }

        let listings = Arc::new(load().await?);
        let mut guard = self.snapshot.write().await;
        *guard = Some(Snapshot {
            version: observed,
            listings: Arc::clone(&listings),
        });
        debug!(version = observed, count = listings.len(), "catalogue cache refreshed");
        Ok(listings)
    }

    async fn fresh(&self, version: u64) -> Option<Arc<Vec<CourseListing>>> {
        let guard = self.snapshot.read().await;
        guard
            .as_ref()
            .filter(|snapshot| snapshot.version == version)
            .map(|snapshot| Arc::clone(&snapshot.listings))
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    async fn load_counting(
        cache: &CatalogueCache,
        loads: &AtomicUsize,
    ) -> Arc<Vec<CourseListing>> {
        let result: Result<_, Infallible> = cache
            .get_or_load(|| async {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(Vec::new())
            })
            .await;
        match result {
            Ok(listings) => listings,
            Err(never) => match never {},
        }
    }

    #[tokio::test]
    async fn reuses_snapshot_until_invalidated() {
        let cache = CatalogueCache::new();
        let loads = AtomicUsize::new(0);

        load_counting(&cache, &loads).await;
        load_counting(&cache, &loads).await;
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        cache.invalidate();
        assert_eq!(cache.version(), 1);
        load_counting(&cache, &loads).await;
        load_counting(&cache, &loads).await;
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_load_leaves_cache_empty() {
        let cache = CatalogueCache::new();
        let failed: Result<_, &str> = cache.get_or_load(|| async { Err("db down") }).await;
        assert_eq!(failed.err(), Some("db down"));

        let loads = AtomicUsize::new(0);
        load_counting(&cache, &loads).await;
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
