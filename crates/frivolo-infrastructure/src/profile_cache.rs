//! Local profile cache on top of a key-value store.

use std::sync::Arc;

use frivolo_core::error::Result;
use frivolo_core::storage::{KeyValueStore, USER_DATA_KEY};
use frivolo_core::user::{CachedProfile, ProfileCache, UserProfile};
use tracing::{debug, error, info, warn};

use version_migrate::Migrator;

use crate::dto::{USER_PROFILE_ENTITY, create_user_profile_migrator, to_flat_json};

/// Keeps the serialized profile under [`USER_DATA_KEY`].
///
/// The entry is JSON tagged with its schema version and migrated on load.
/// Anything that fails to parse or migrate is removed so the next start
/// begins from a clean slate.
#[derive(Clone)]
pub struct LocalProfileCache {
    store: Arc<dyn KeyValueStore>,
    migrator: Arc<Migrator>,
}

impl LocalProfileCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            migrator: Arc::new(create_user_profile_migrator()),
        }
    }

    fn decode(&self, raw: &str) -> Result<CachedProfile> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let cached: CachedProfile = self.migrator.load_flat_from(USER_PROFILE_ENTITY, value)?;
        Ok(cached)
    }

    fn discard_unreadable(&self, reason: &str) {
        warn!("[ProfileCache] Discarding cached profile: {}", reason);
        if let Err(e) = self.store.remove(USER_DATA_KEY) {
            error!("[ProfileCache] Failed to clear unreadable entry: {}", e);
        }
    }
}

impl ProfileCache for LocalProfileCache {
    fn load(&self) -> Option<CachedProfile> {
        let raw = match self.store.get(USER_DATA_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("[ProfileCache] No cached profile");
                return None;
            }
            Err(e) => {
                error!("[ProfileCache] Failed to read cached profile: {}", e);
                return None;
            }
        };

        match self.decode(&raw) {
            Ok(cached) => {
                if let CachedProfile::Incomplete(draft) = &cached {
                    info!(
                        "[ProfileCache] Cached profile is missing {:?}",
                        draft.missing_fields()
                    );
                }
                Some(cached)
            }
            Err(e) => {
                self.discard_unreadable(&e.to_string());
                None
            }
        }
    }

    fn save(&self, profile: &UserProfile) -> Result<()> {
        let json = to_flat_json(profile)?;
        self.store.set(USER_DATA_KEY, &json)?;
        debug!("[ProfileCache] Cached profile for {}", profile.name);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.store.remove(USER_DATA_KEY)?;
        info!("[ProfileCache] Cleared cached profile");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
    use frivolo_core::user::{DEFAULT_COUNTRY, ProfileField};
    use tempfile::TempDir;

    fn profile() -> UserProfile {
        UserProfile {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            age: 30,
            country: DEFAULT_COUNTRY.to_string(),
            job: "Diseñador Gráfico".to_string(),
            monthly_salary: 20000.0,
            hours_per_day: 8.0,
            days_per_week: 5.0,
        }
    }

    #[test]
    fn test_save_then_load() {
        let cache = LocalProfileCache::new(Arc::new(MemoryKeyValueStore::new()));
        assert!(cache.load().is_none());

        cache.save(&profile()).unwrap();
        assert_eq!(cache.load(), Some(CachedProfile::Complete(profile())));
    }

    #[test]
    fn test_clear() {
        let cache = LocalProfileCache::new(Arc::new(MemoryKeyValueStore::new()));
        cache.save(&profile()).unwrap();
        cache.clear().unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_corrupt_entry_is_cleared() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set(USER_DATA_KEY, "{not json").unwrap();
        let cache = LocalProfileCache::new(store.clone());

        assert!(cache.load().is_none());
        assert_eq!(store.get(USER_DATA_KEY).unwrap(), None);
    }

    #[test]
    fn test_old_schema_loads_as_incomplete() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store
            .set(
                USER_DATA_KEY,
                r#"{"version":"1.0.0","name":"Luis","age":41,"country":"México","monthlySalary":12000,"hoursPerDay":6,"daysPerWeek":6}"#,
            )
            .unwrap();
        let cache = LocalProfileCache::new(store);

        match cache.load() {
            Some(CachedProfile::Incomplete(draft)) => {
                assert!(draft.is_blank(ProfileField::Email));
                assert!(draft.is_blank(ProfileField::Job));
                assert_eq!(draft.get(ProfileField::HoursPerDay), Some("6"));
            }
            other => panic!("expected incomplete profile, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_version_is_cleared() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store
            .set(USER_DATA_KEY, r#"{"version":"7.0.0","name":"Ana"}"#)
            .unwrap();
        let cache = LocalProfileCache::new(store.clone());

        assert!(cache.load().is_none());
        assert_eq!(store.get(USER_DATA_KEY).unwrap(), None);
    }

    #[test]
    fn test_survives_restart_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_state.toml");

        LocalProfileCache::new(Arc::new(FileKeyValueStore::new(path.clone())))
            .save(&profile())
            .unwrap();

        let reopened = LocalProfileCache::new(Arc::new(FileKeyValueStore::new(path)));
        assert_eq!(reopened.load(), Some(CachedProfile::Complete(profile())));
    }
}
