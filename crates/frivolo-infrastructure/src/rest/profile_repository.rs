use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, instrument};

use frivolo_core::config::UpsertStrategy;
use frivolo_core::error::{FrivoloError, Result};
use frivolo_core::identity::Identity;
use frivolo_core::user::{ProfileRepository, StoredProfile, UserProfile};

use super::USERS_TABLE;
use super::client::{RestClient, eq};
use crate::dto::{UserKey, UserRow, UserWrite};

/// `users` table access.
pub struct RestProfileRepository {
    client: RestClient,
    strategy: UpsertStrategy,
}

impl RestProfileRepository {
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            strategy: UpsertStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: UpsertStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    async fn check_then_write(&self, payload: &UserWrite<'_>) -> Result<Vec<UserRow>> {
        let filter = [("user_id", eq(payload.user_id))];
        let existing: Vec<UserKey> = self
            .client
            .select_columns(USERS_TABLE, "user_id", &filter)
            .await?;

        if existing.is_empty() {
            debug!("[ProfileStore] No row for {}, inserting", payload.user_id);
            self.client
                .insert(USERS_TABLE, &[], &[], std::slice::from_ref(payload))
                .await
        } else {
            debug!("[ProfileStore] Row exists for {}, updating", payload.user_id);
            self.client.update(USERS_TABLE, &filter, payload).await
        }
    }

    async fn on_conflict(&self, payload: &UserWrite<'_>) -> Result<Vec<UserRow>> {
        self.client
            .insert(
                USERS_TABLE,
                &[("on_conflict", "user_id".to_string())],
                &["resolution=merge-duplicates"],
                std::slice::from_ref(payload),
            )
            .await
    }
}

#[async_trait]
impl ProfileRepository for RestProfileRepository {
    #[instrument(skip(self, profile), fields(user_id = %identity))]
    async fn upsert_profile(
        &self,
        identity: &Identity,
        profile: &UserProfile,
    ) -> Result<StoredProfile> {
        let payload = UserWrite::new(identity, profile, Utc::now());

        let rows = match self.strategy {
            UpsertStrategy::CheckThenWrite => self.check_then_write(&payload).await?,
            UpsertStrategy::OnConflict => self.on_conflict(&payload).await?,
        };

        let row = rows.into_iter().next().ok_or_else(|| {
            FrivoloError::backend(None, "upsert on 'users' returned no row")
        })?;
        info!("[ProfileStore] Saved profile for {}", identity);
        StoredProfile::try_from(row)
    }

    #[instrument(skip(self), fields(user_id = %identity))]
    async fn fetch_profile(&self, identity: &Identity) -> Result<Option<StoredProfile>> {
        let rows: Vec<UserRow> = self
            .client
            .select(USERS_TABLE, &[("user_id", eq(identity))])
            .await?;

        if rows.len() > 1 {
            // duplicates from the check-then-write race; newest wins
            debug!(
                "[ProfileStore] {} rows for {}, using the most recent",
                rows.len(),
                identity
            );
        }
        rows.into_iter()
            .max_by_key(|row| row.updated_at)
            .map(StoredProfile::try_from)
            .transpose()
    }
}
