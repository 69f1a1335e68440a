//! Request-deduplicating cache for catalog sources.

use super::client::{CatalogSource, SourceId};
use crate::error::PlannerError;
use crate::types::Lecture;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// A loaded catalog. Lectures are individually shared so search views and timetables
/// can hold them without copying.
pub type Catalog = Arc<Vec<Arc<Lecture>>>;

type SharedFetch = Shared<BoxFuture<'static, Result<Catalog, PlannerError>>>;

/// Caches each catalog source's lecture list for the lifetime of the cache.
///
/// Every source is requested at most once: callers that arrive while a request is in
/// flight await the same shared future. A failed request is handed to everyone waiting
/// on it and then evicted, so the next call starts a fresh request.
pub struct FetchCache<S> {
    source: S,
    entries: DashMap<SourceId, SharedFetch>,
    requests: AtomicU64,
    hits: AtomicU64,
}

impl<S: CatalogSource> FetchCache<S> {
    /// Creates an empty cache in front of `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: DashMap::new(),
            requests: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    /// Returns the lecture list of `source_id`, requesting it only if no request has been
    /// made yet (or the previous one failed).
    pub async fn fetch(&self, source_id: SourceId) -> Result<Catalog, PlannerError> {
        let shared = match self.entries.entry(source_id) {
            Entry::Occupied(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(source = %source_id, "Catalog cache hit");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                self.requests.fetch_add(1, Ordering::Relaxed);
                debug!(source = %source_id, "Catalog cache miss, starting request");
                let request = self
                    .source
                    .fetch(source_id)
                    .map(|result| {
                        result.map(|lectures| {
                            Arc::new(lectures.into_iter().map(Arc::new).collect::<Vec<_>>())
                        })
                    })
                    .boxed()
                    .shared();
                entry.insert(request.clone());
                request
            }
        };

        let result = shared.clone().await;

        if let Err(e) = &result {
            // Only evict our own request; a retry may already have replaced it
            self.entries
                .remove_if(&source_id, |_, cached| cached.ptr_eq(&shared));
            warn!(source = %source_id, error = %e, "Catalog request failed, entry evicted");
        }

        result
    }

    /// Requests every source concurrently and concatenates them, majors first.
    ///
    /// Total wait is bounded by the slowest source.
    pub async fn fetch_all(&self) -> Result<Catalog, PlannerError> {
        let (majors, liberal_arts) = futures::try_join!(
            self.fetch(SourceId::Majors),
            self.fetch(SourceId::LiberalArts)
        )?;

        let mut all = Vec::with_capacity(majors.len() + liberal_arts.len());
        all.extend(majors.iter().cloned());
        all.extend(liberal_arts.iter().cloned());
        Ok(Arc::new(all))
    }

    /// Returns a source's lecture list without waiting, if it has already loaded.
    pub fn peek(&self, source_id: SourceId) -> Option<Catalog> {
        self.entries
            .get(&source_id)
            .and_then(|entry| entry.peek().cloned())
            .and_then(Result::ok)
    }

    /// Invalidates (removes) a cached source. The next fetch issues a new request.
    pub fn invalidate(&self, source_id: SourceId) {
        self.entries.remove(&source_id);
    }

    /// Clears all entries from the cache.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Gets cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut cached = 0;
        let mut in_flight = 0;

        for entry in self.entries.iter() {
            if entry.peek().is_some() {
                cached += 1;
            } else {
                in_flight += 1;
            }
        }

        CacheStats {
            requests: self.requests.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            cached_sources: cached,
            in_flight,
        }
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Underlying requests started
    pub requests: u64,
    /// Calls served by an existing (resolved or in-flight) entry
    pub hits: u64,
    pub cached_sources: usize,
    pub in_flight: usize,
}
