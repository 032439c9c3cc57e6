//! Saved search list.
//!
//! Refreshes are tagged with a generation number. Closing the list or
//! starting another refresh bumps the generation, and a response carrying
//! an older number is dropped instead of being applied.

use std::sync::{Arc, Mutex, MutexGuard};

use frivolo_core::error::{FrivoloError, Result};
use frivolo_core::identity::Identity;
use frivolo_core::search::{SearchRecord, SearchRepository};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryState {
    /// Closed, or never opened.
    Idle,
    Loading,
    Loaded(Vec<SearchRecord>),
    /// The backend could not be read. Distinct from an empty list.
    Failed(String),
}

#[derive(Debug)]
struct Inner {
    state: HistoryState,
    generation: u64,
}

/// The history panel of one user.
#[derive(Clone)]
pub struct SearchHistory {
    repository: Arc<dyn SearchRepository>,
    identity: Identity,
    inner: Arc<Mutex<Inner>>,
}

impl SearchHistory {
    pub fn new(repository: Arc<dyn SearchRepository>, identity: Identity) -> Self {
        Self {
            repository,
            identity,
            inner: Arc::new(Mutex::new(Inner {
                state: HistoryState::Idle,
                generation: 0,
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| FrivoloError::internal("history lock poisoned"))
    }

    pub fn state(&self) -> HistoryState {
        self.lock()
            .map(|inner| inner.state.clone())
            .unwrap_or(HistoryState::Idle)
    }

    /// Records currently shown; empty unless loaded.
    pub fn records(&self) -> Vec<SearchRecord> {
        match self.state() {
            HistoryState::Loaded(records) => records,
            _ => Vec::new(),
        }
    }

    /// Loads the list from the repository.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The result was applied
    /// - `Ok(false)`: The list was closed or refreshed again meanwhile;
    ///   the result was discarded
    /// - `Err(_)`: The backend failed; state is `Failed`
    pub async fn refresh(&self) -> Result<bool> {
        let generation = {
            let mut inner = self.lock()?;
            inner.generation += 1;
            inner.state = HistoryState::Loading;
            inner.generation
        };

        let result = self.repository.list_searches(&self.identity).await;

        let mut inner = self.lock()?;
        if inner.generation != generation {
            debug!(
                "[SearchHistory] Discarding stale result (generation {} < {})",
                generation, inner.generation
            );
            return Ok(false);
        }

        match result {
            Ok(records) => {
                info!("[SearchHistory] Loaded {} searches", records.len());
                inner.state = HistoryState::Loaded(records);
                Ok(true)
            }
            Err(e) => {
                error!("[SearchHistory] Failed to load searches: {}", e);
                inner.state = HistoryState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Hides the list and invalidates any refresh still in flight.
    pub fn close(&self) {
        if let Ok(mut inner) = self.lock() {
            inner.generation += 1;
            inner.state = HistoryState::Idle;
        }
    }

    /// Saved cost of the `index`-th row, for reuse in the calculator.
    pub fn select(&self, index: usize) -> Option<f64> {
        self.record_at(index).map(|record| record.product_cost)
    }

    pub fn record_at(&self, index: usize) -> Option<SearchRecord> {
        self.records().into_iter().nth(index)
    }

    /// Deletes a search remotely and, only if that succeeds, from the list.
    ///
    /// Returns false when the backend reported a failure.
    pub async fn delete(&self, search_id: &str) -> bool {
        if let Err(e) = self.repository.delete_search(search_id).await {
            warn!("[SearchHistory] Failed to delete {}: {}", search_id, e);
            return false;
        }

        if let Ok(mut inner) = self.lock()
            && let HistoryState::Loaded(records) = &mut inner.state
        {
            records.retain(|record| record.id != search_id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use frivolo_core::search::NewSearch;
    use frivolo_infrastructure::MemorySearchRepository;
    use tokio::sync::Notify;

    async fn seeded() -> (MemorySearchRepository, Identity) {
        let repo = MemorySearchRepository::new();
        let identity = Identity::new("user_abc_1");
        for (name, cost) in [("Tenis", 1200.0), ("Audífonos", 250.0)] {
            let search = NewSearch::new(name, cost, cost / 125.0, 125.0).unwrap();
            repo.create_search(&identity, &search).await.unwrap();
        }
        (repo, identity)
    }

    #[tokio::test]
    async fn test_refresh_loads_newest_first() {
        let (repo, identity) = seeded().await;
        let history = SearchHistory::new(Arc::new(repo), identity);
        assert_eq!(history.state(), HistoryState::Idle);

        assert!(history.refresh().await.unwrap());
        let records = history.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product_name, "Audífonos");
        assert_eq!(history.select(1), Some(1200.0));
        assert_eq!(history.select(5), None);
    }

    #[tokio::test]
    async fn test_refresh_failure_is_not_empty_list() {
        let (repo, identity) = seeded().await;
        repo.set_unavailable(true);
        let history = SearchHistory::new(Arc::new(repo), identity);

        assert!(history.refresh().await.is_err());
        assert!(matches!(history.state(), HistoryState::Failed(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_only_on_success() {
        let (repo, identity) = seeded().await;
        let history = SearchHistory::new(Arc::new(repo.clone()), identity);
        history.refresh().await.unwrap();
        let first = history.record_at(0).unwrap();

        repo.set_unavailable(true);
        assert!(!history.delete(&first.id).await);
        assert_eq!(history.records().len(), 2);

        repo.set_unavailable(false);
        assert!(history.delete(&first.id).await);
        let remaining = history.records();
        assert_eq!(remaining.len(), 1);
        assert_ne!(remaining[0].id, first.id);
    }

    /// Blocks `list_searches` until released.
    struct GatedRepository {
        inner: MemorySearchRepository,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl SearchRepository for GatedRepository {
        async fn create_search(
            &self,
            identity: &Identity,
            search: &NewSearch,
        ) -> Result<SearchRecord> {
            self.inner.create_search(identity, search).await
        }

        async fn list_searches(&self, identity: &Identity) -> Result<Vec<SearchRecord>> {
            self.gate.notified().await;
            self.inner.list_searches(identity).await
        }

        async fn delete_search(&self, search_id: &str) -> Result<()> {
            self.inner.delete_search(search_id).await
        }
    }

    #[tokio::test]
    async fn test_close_discards_in_flight_result() {
        let (repo, identity) = seeded().await;
        let gate = Arc::new(Notify::new());
        let history = SearchHistory::new(
            Arc::new(GatedRepository {
                inner: repo,
                gate: gate.clone(),
            }),
            identity,
        );

        let pending = tokio::spawn({
            let history = history.clone();
            async move { history.refresh().await }
        });
        tokio::task::yield_now().await;
        assert_eq!(history.state(), HistoryState::Loading);

        history.close();
        gate.notify_one();

        assert!(!pending.await.unwrap().unwrap());
        assert_eq!(history.state(), HistoryState::Idle);
    }
}
