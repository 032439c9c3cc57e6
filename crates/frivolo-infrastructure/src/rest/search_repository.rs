use async_trait::async_trait;
use tracing::{debug, info, instrument};

use frivolo_core::error::{FrivoloError, Result};
use frivolo_core::identity::Identity;
use frivolo_core::search::{NewSearch, SearchRecord, SearchRepository};

use super::SAVED_SEARCHES_TABLE;
use super::client::{RestClient, eq};
use crate::dto::{SearchInsert, SearchRow};

/// `saved_searches` table access.
pub struct RestSearchRepository {
    client: RestClient,
}

impl RestSearchRepository {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchRepository for RestSearchRepository {
    #[instrument(skip(self, search), fields(user_id = %identity))]
    async fn create_search(
        &self,
        identity: &Identity,
        search: &NewSearch,
    ) -> Result<SearchRecord> {
        let payload = [SearchInsert::new(identity, search)];
        let rows: Vec<SearchRow> = self
            .client
            .insert(SAVED_SEARCHES_TABLE, &[], &[], &payload)
            .await?;

        let record: SearchRecord = rows
            .into_iter()
            .next()
            .ok_or_else(|| FrivoloError::backend(None, "insert on 'saved_searches' returned no row"))?
            .into();
        info!(
            "[SearchStore] Saved '{}' as {}",
            record.product_name, record.id
        );
        Ok(record)
    }

    #[instrument(skip(self), fields(user_id = %identity))]
    async fn list_searches(&self, identity: &Identity) -> Result<Vec<SearchRecord>> {
        let rows: Vec<SearchRow> = self
            .client
            .select(
                SAVED_SEARCHES_TABLE,
                &[
                    ("user_id", eq(identity)),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await?;

        let mut records: Vec<SearchRecord> = rows.into_iter().map(SearchRecord::from).collect();
        // the backend already orders; keep the guarantee if it ignores `order`
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!("[SearchStore] Listed {} searches", records.len());
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn delete_search(&self, search_id: &str) -> Result<()> {
        self.client
            .delete(SAVED_SEARCHES_TABLE, &[("id", eq(search_id))])
            .await?;
        info!("[SearchStore] Deleted search {}", search_id);
        Ok(())
    }
}
