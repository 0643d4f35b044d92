//! One-entry cache of fetched raw grid data
//!
//! A logical query usually asks the adapter for both the records and the total
//! row count. The first request fetches, the second is served from here. The
//! entry is keyed by the criteria identity, so a different criteria instance
//! or a paging change on the same instance triggers a new fetch.

use gridsource_catalog::{SourceAdapter, SourceError};
use gridsource_core::{CriteriaIdentity, SearchCriteria};

#[derive(Debug)]
struct CacheEntry<R> {
    identity: CriteriaIdentity,
    data: R,
}

/// Holds the raw data of the most recent criteria
#[derive(Debug)]
pub struct RawGridDataCache<R> {
    entry: Option<CacheEntry<R>>,
}

impl<R> RawGridDataCache<R> {
    pub fn new() -> Self {
        Self { entry: None }
    }

    /// Whether data for `criteria` in its current state is held
    pub fn is_cached_for(&self, criteria: &SearchCriteria) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| entry.identity == criteria.identity())
    }

    /// Whether any entry is held
    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    /// Drop the cached entry
    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// Cached data for `criteria`, fetching through `adapter` on a miss
    ///
    /// A failed fetch leaves the cache empty.
    pub async fn get_or_fetch<A>(
        &mut self,
        adapter: &A,
        criteria: &SearchCriteria,
    ) -> Result<&R, SourceError>
    where
        A: SourceAdapter<RawData = R>,
    {
        let identity = criteria.identity();
        let entry = match self.entry.take() {
            Some(entry) if entry.identity == identity => entry,
            _ => {
                tracing::debug!(
                    adapter = adapter.name(),
                    page = criteria.current_page(),
                    page_size = criteria.page_size(),
                    "fetching grid data"
                );
                CacheEntry {
                    identity,
                    data: adapter.fetch_data(criteria).await?,
                }
            }
        };
        Ok(&self.entry.insert(entry).data)
    }
}

impl<R> Default for RawGridDataCache<R> {
    fn default() -> Self {
        Self::new()
    }
}
