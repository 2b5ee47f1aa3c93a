//! Time-boxed dataset cache shared by all requests
//!
//! The store owns the only copy of the fetched table. Requests read it through
//! [`DatasetStore::current`], which re-fetches once the entry is older than the
//! configured TTL. A failed re-fetch keeps serving the previous table.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use inflatrack_core::{Dataset, InflationSource, Result, TimedCache};

/// Cache bookkeeping reported by `/api/meta`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub age_secs: i64,
    pub records: usize,
}

pub struct DatasetStore {
    source: Arc<dyn InflationSource>,
    ttl: Duration,
    cache: RwLock<Option<TimedCache<Arc<Dataset>>>>,
}

impl DatasetStore {
    pub fn new(source: Arc<dyn InflationSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: RwLock::new(None),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached dataset, fetching it first when missing or stale
    pub async fn current(&self) -> Result<Arc<Dataset>> {
        {
            let guard = self.cache.read().await;
            if let Some(entry) = guard.as_ref() {
                if !entry.is_stale(Utc::now(), self.ttl) {
                    return Ok(entry.value().clone());
                }
            }
        }

        let mut guard = self.cache.write().await;

        // Another request may have refreshed while we waited for the lock
        if let Some(entry) = guard.as_ref() {
            if !entry.is_stale(Utc::now(), self.ttl) {
                return Ok(entry.value().clone());
            }
        }

        match self.source.fetch().await {
            Ok(dataset) => {
                info!(
                    source = self.source.name(),
                    records = dataset.len(),
                    "Dataset loaded"
                );
                let dataset = Arc::new(dataset);
                *guard = Some(TimedCache::fresh(dataset.clone()));
                Ok(dataset)
            }
            Err(e) => match guard.as_ref() {
                Some(entry) => {
                    warn!(
                        error = %e,
                        age_secs = entry.age(Utc::now()).num_seconds(),
                        "Refresh failed, serving cached dataset"
                    );
                    Ok(entry.value().clone())
                }
                None => Err(e),
            },
        }
    }

    /// Fetch now regardless of the entry's age
    ///
    /// On failure the previous entry stays in place and the error is returned.
    pub async fn refresh(&self) -> Result<Arc<Dataset>> {
        let dataset = Arc::new(self.source.fetch().await?);
        let mut guard = self.cache.write().await;
        *guard = Some(TimedCache::fresh(dataset.clone()));
        info!(
            source = self.source.name(),
            records = dataset.len(),
            "Dataset refreshed"
        );
        Ok(dataset)
    }

    pub async fn status(&self) -> Option<CacheStatus> {
        let guard = self.cache.read().await;
        guard.as_ref().map(|entry| CacheStatus {
            source: self.source.name().to_string(),
            fetched_at: entry.fetched_at,
            expires_at: entry.expires_at(self.ttl),
            age_secs: entry.age(Utc::now()).num_seconds(),
            records: entry.value().len(),
        })
    }

    /// Replace the cache entry (used to age entries in tests)
    #[cfg(test)]
    pub(crate) async fn set_entry(&self, entry: TimedCache<Arc<Dataset>>) {
        *self.cache.write().await = Some(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use inflatrack_core::test_utils::sample_dataset;
    use inflatrack_core::{Error, StaticSource};

    /// Succeeds on the first fetch, fails afterwards
    struct FlakySource {
        dataset: Dataset,
        calls: AtomicUsize,
    }

    impl FlakySource {
        fn new() -> Self {
            Self {
                dataset: sample_dataset(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InflationSource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn fetch(&self) -> Result<Dataset> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(self.dataset.clone())
            } else {
                Err(Error::Upstream("offline".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_current_fetches_once_while_fresh() {
        let source = Arc::new(FlakySource::new());
        let store = DatasetStore::new(source.clone(), Duration::seconds(3600));

        let first = store.current().await.unwrap();
        let second = store.current().await.unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_served_when_refetch_fails() {
        let source = Arc::new(FlakySource::new());
        let ttl = Duration::seconds(60);
        let store = DatasetStore::new(source.clone(), ttl);

        let dataset = store.current().await.unwrap();
        store
            .set_entry(TimedCache::new(dataset.clone(), Utc::now() - ttl))
            .await;

        let served = store.current().await.unwrap();
        assert_eq!(served.len(), dataset.len());
        assert_eq!(source.calls(), 2);
        assert!(matches!(store.refresh().await, Err(Error::Upstream(_))));
        assert!(store.status().await.is_some());
    }

    #[tokio::test]
    async fn test_empty_source_propagates_upstream() {
        let store = DatasetStore::new(
            Arc::new(StaticSource::new(Dataset::default())),
            Duration::seconds(60),
        );
        assert!(matches!(store.current().await, Err(Error::Upstream(_))));
        assert!(store.status().await.is_none());
    }

    #[tokio::test]
    async fn test_status_after_load() {
        let store = DatasetStore::new(
            Arc::new(StaticSource::new(sample_dataset())),
            Duration::seconds(3600),
        );
        store.refresh().await.unwrap();

        let status = store.status().await.unwrap();
        assert_eq!(status.source, "static");
        assert_eq!(status.records, sample_dataset().len());
        assert_eq!(status.expires_at - status.fetched_at, Duration::seconds(3600));
    }
}
