use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How the profile store writes a profile.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpsertStrategy {
    /// Read by `user_id`, then insert or update. Two concurrent writers for
    /// the same identity can create duplicate rows.
    #[default]
    CheckThenWrite,
    /// Single insert with `on_conflict=user_id` and merge resolution.
    /// Requires a unique constraint on `users.user_id`.
    OnConflict,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Base URL of the REST endpoint, e.g. `https://xyz.supabase.co/rest/v1`.
    /// Unset means no remote backend.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub upsert_strategy: UpsertStrategy,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            upsert_strategy: UpsertStrategy::default(),
        }
    }
}

impl BackendConfig {
    /// True when a non-blank URL is configured.
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct StorageConfig {
    /// Directory holding local state. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `FRIVOLO_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.logging.level, "warn");
        assert!(!config.backend.is_configured());
    }

    #[test]
    fn test_parse_backend_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [backend]
            url = "https://example.supabase.co/rest/v1"
            api_key = "anon"
            upsert_strategy = "on_conflict"
            "#,
        )
        .unwrap();

        assert!(config.backend.is_configured());
        assert_eq!(config.backend.api_key.as_deref(), Some("anon"));
        assert_eq!(config.backend.upsert_strategy, UpsertStrategy::OnConflict);
        assert_eq!(config.backend.timeout_secs, 10);
    }

    #[test]
    fn test_blank_url_is_not_configured() {
        let backend = BackendConfig {
            url: Some("  ".to_string()),
            ..BackendConfig::default()
        };
        assert!(!backend.is_configured());
    }
}
