use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use frivolo_core::error::Result;
use frivolo_core::identity::Identity;
use frivolo_core::user::{ProfileRepository, StoredProfile, UserProfile};

use super::unavailable_error;

/// Profiles keyed by identity. Upserts are atomic.
#[derive(Clone, Default)]
pub struct MemoryProfileRepository {
    profiles: Arc<RwLock<HashMap<String, StoredProfile>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(unavailable_error("profile store"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn upsert_profile(
        &self,
        identity: &Identity,
        profile: &UserProfile,
    ) -> Result<StoredProfile> {
        self.check_available()?;
        let now = Utc::now();
        let mut profiles = self.profiles.write().await;

        let stored = profiles
            .entry(identity.as_str().to_string())
            .and_modify(|existing| {
                existing.profile = profile.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| StoredProfile {
                id: Some(Uuid::new_v4().to_string()),
                user_id: identity.as_str().to_string(),
                profile: profile.clone(),
                created_at: Some(now),
                updated_at: now,
            })
            .clone();

        debug!("[ProfileStore] Stored profile for {} in memory", identity);
        Ok(stored)
    }

    async fn fetch_profile(&self, identity: &Identity) -> Result<Option<StoredProfile>> {
        self.check_available()?;
        Ok(self.profiles.read().await.get(identity.as_str()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frivolo_core::user::DEFAULT_COUNTRY;

    fn profile(salary: f64) -> UserProfile {
        UserProfile {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            age: 30,
            country: DEFAULT_COUNTRY.to_string(),
            job: "Contador".to_string(),
            monthly_salary: salary,
            hours_per_day: 8.0,
            days_per_week: 5.0,
        }
    }

    #[tokio::test]
    async fn test_upsert_then_fetch_roundtrip() {
        let repo = MemoryProfileRepository::new();
        let identity = Identity::new("user_abc_1");

        let stored = repo.upsert_profile(&identity, &profile(20000.0)).await.unwrap();
        let fetched = repo.fetch_profile(&identity).await.unwrap().unwrap();

        assert_eq!(stored, fetched);
        assert_eq!(fetched.profile, profile(20000.0));
        assert_eq!(fetched.user_id, "user_abc_1");
    }

    #[tokio::test]
    async fn test_second_upsert_updates_in_place() {
        let repo = MemoryProfileRepository::new();
        let identity = Identity::new("user_abc_1");

        let first = repo.upsert_profile(&identity, &profile(20000.0)).await.unwrap();
        let second = repo.upsert_profile(&identity, &profile(25000.0)).await.unwrap();

        assert_eq!(repo.len().await, 1);
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(second.profile.monthly_salary, 25000.0);
    }

    #[tokio::test]
    async fn test_fetch_unknown_identity() {
        let repo = MemoryProfileRepository::new();
        assert!(repo.fetch_profile(&Identity::new("nobody")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unavailable() {
        let repo = MemoryProfileRepository::new();
        repo.set_unavailable(true);
        let err = repo
            .upsert_profile(&Identity::new("u"), &profile(1.0))
            .await
            .unwrap_err();
        assert!(err.is_backend());
        assert!(repo.is_empty().await);
    }
}
