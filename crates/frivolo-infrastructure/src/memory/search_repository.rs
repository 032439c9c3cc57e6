use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use frivolo_core::error::Result;
use frivolo_core::identity::Identity;
use frivolo_core::search::{NewSearch, SearchRecord, SearchRepository};

use super::unavailable_error;

#[derive(Default)]
struct Inner {
    // (insertion sequence, record); the sequence breaks created_at ties
    records: Vec<(u64, SearchRecord)>,
    next_seq: u64,
}

/// Saved searches held in memory.
#[derive(Clone, Default)]
pub struct MemorySearchRepository {
    inner: Arc<RwLock<Inner>>,
    unavailable: Arc<AtomicBool>,
}

impl MemorySearchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Inserts a fully formed record, keeping its id and timestamp.
    pub async fn insert_record(&self, record: SearchRecord) {
        let mut inner = self.inner.write().await;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.records.push((seq, record));
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable_error("search store"));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchRepository for MemorySearchRepository {
    async fn create_search(
        &self,
        identity: &Identity,
        search: &NewSearch,
    ) -> Result<SearchRecord> {
        self.check_available()?;
        let record = SearchRecord {
            id: Uuid::new_v4().to_string(),
            user_id: identity.as_str().to_string(),
            product_name: search.product_name().to_string(),
            product_cost: search.product_cost(),
            hours_needed: search.hours_needed(),
            hourly_wage: search.hourly_wage(),
            created_at: Utc::now(),
        };
        self.insert_record(record.clone()).await;
        debug!("[SearchStore] Stored search {} in memory", record.id);
        Ok(record)
    }

    async fn list_searches(&self, identity: &Identity) -> Result<Vec<SearchRecord>> {
        self.check_available()?;
        let inner = self.inner.read().await;

        let mut owned: Vec<&(u64, SearchRecord)> = inner
            .records
            .iter()
            .filter(|(_, record)| record.user_id == identity.as_str())
            .collect();
        owned.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });

        Ok(owned.into_iter().map(|(_, record)| record.clone()).collect())
    }

    async fn delete_search(&self, search_id: &str) -> Result<()> {
        self.check_available()?;
        let mut inner = self.inner.write().await;
        inner.records.retain(|(_, record)| record.id != search_id);
        Ok(())
    }
}
