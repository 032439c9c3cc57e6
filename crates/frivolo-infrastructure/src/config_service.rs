//! Configuration loading.
//!
//! Precedence, lowest first: built-in defaults, `config.toml`, environment
//! variables. Command-line flags are applied by the binary on top.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use frivolo_core::config::AppConfig;
use frivolo_core::error::{FrivoloError, Result};
use tracing::{debug, warn};

use crate::paths::FrivoloPaths;

pub const ENV_BACKEND_URL: &str = "FRIVOLO_BACKEND_URL";
pub const ENV_BACKEND_API_KEY: &str = "FRIVOLO_BACKEND_API_KEY";
pub const ENV_DATA_DIR: &str = "FRIVOLO_DATA_DIR";
pub const ENV_LOG: &str = "FRIVOLO_LOG";

/// Loads and caches the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    /// Reads from the platform config file.
    pub fn new() -> Self {
        Self {
            path: FrivoloPaths::config_file().ok(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Reads from an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it on first access.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| FrivoloError::internal("config cache lock poisoned"))?;
            if let Some(cached) = read_lock.as_ref() {
                return Ok(cached.clone());
            }
        }

        let mut config = match &self.path {
            Some(path) => load_file(path)?,
            None => {
                warn!("[Config] No config directory available, using defaults");
                AppConfig::default()
            }
        };
        apply_env(&mut config, |key| std::env::var(key).ok());

        let mut write_lock = self
            .config
            .write()
            .map_err(|_| FrivoloError::internal("config cache lock poisoned"))?;
        *write_lock = Some(config.clone());
        Ok(config)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// A missing file yields the defaults; a malformed one is an error.
fn load_file(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        debug!("[Config] {} not found, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        FrivoloError::config(format!("invalid config file {}: {}", path.display(), e))
    })
}

/// Overlays environment variables read through `lookup`.
pub fn apply_env<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty(ENV_BACKEND_URL) {
        config.backend.url = Some(url);
    }
    if let Some(key) = non_empty(ENV_BACKEND_API_KEY) {
        config.backend.api_key = Some(key);
    }
    if let Some(dir) = non_empty(ENV_DATA_DIR) {
        config.storage.data_dir = Some(PathBuf::from(dir));
    }
    if let Some(level) = non_empty(ENV_LOG) {
        config.logging.level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frivolo_core::config::UpsertStrategy;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_file(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[backend\nurl = ").unwrap();
        assert!(matches!(load_file(&path), Err(FrivoloError::Config(_))));
    }

    #[test]
    fn test_file_values_are_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[backend]\nurl = \"http://localhost:54321/rest/v1\"\nupsert_strategy = \"on_conflict\"\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let service = ConfigService::with_path(&path);
        let config = service.get_config().unwrap();
        assert_eq!(
            config.backend.url.as_deref(),
            Some("http://localhost:54321/rest/v1")
        );
        assert_eq!(config.backend.upsert_strategy, UpsertStrategy::OnConflict);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = AppConfig::default();
        config.backend.url = Some("http://from-file".to_string());

        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BACKEND_URL, "http://from-env"),
            (ENV_BACKEND_API_KEY, "secret"),
            (ENV_DATA_DIR, "/var/lib/frivolo"),
            (ENV_LOG, ""),
        ]);
        apply_env(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend.url.as_deref(), Some("http://from-env"));
        assert_eq!(config.backend.api_key.as_deref(), Some("secret"));
        assert_eq!(
            config.storage.data_dir,
            Some(PathBuf::from("/var/lib/frivolo"))
        );
        // blank values are ignored
        assert_eq!(config.logging.level, "warn");
    }
}
