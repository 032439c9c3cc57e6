//! Wires the stores behind the flow controller.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use frivolo_application::FlowController;
use frivolo_core::config::AppConfig;
use frivolo_core::identity::IdentityProvider;
use frivolo_core::search::SearchRepository;
use frivolo_core::storage::KeyValueStore;
use frivolo_core::user::ProfileRepository;
use frivolo_infrastructure::{
    FileKeyValueStore, FrivoloPaths, LocalProfileCache, MemoryProfileRepository,
    MemorySearchRepository, RestClient, RestProfileRepository, RestSearchRepository,
};
use tracing::info;

/// Where profiles and searches end up.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendMode {
    Remote(String),
    /// `--offline` was given.
    Offline,
    /// No backend URL configured.
    Unconfigured,
}

impl BackendMode {
    pub fn is_remote(&self) -> bool {
        matches!(self, BackendMode::Remote(_))
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Remote(url) => write!(f, "remote ({})", url),
            BackendMode::Offline => f.write_str("offline (memory only)"),
            BackendMode::Unconfigured => f.write_str("no backend configured (memory only)"),
        }
    }
}

type Repositories = (Arc<dyn ProfileRepository>, Arc<dyn SearchRepository>);

fn repositories(config: &AppConfig, offline: bool) -> Result<(Repositories, BackendMode)> {
    if offline {
        return Ok((memory_repositories(), BackendMode::Offline));
    }
    if !config.backend.is_configured() {
        return Ok((memory_repositories(), BackendMode::Unconfigured));
    }

    let client = RestClient::from_config(&config.backend)?;
    let mode = BackendMode::Remote(client.base_url().to_string());
    let profiles: Arc<dyn ProfileRepository> = Arc::new(
        RestProfileRepository::new(client.clone()).with_strategy(config.backend.upsert_strategy),
    );
    let searches: Arc<dyn SearchRepository> = Arc::new(RestSearchRepository::new(client));
    Ok(((profiles, searches), mode))
}

fn memory_repositories() -> Repositories {
    (
        Arc::new(MemoryProfileRepository::new()),
        Arc::new(MemorySearchRepository::new()),
    )
}

/// Builds a controller over the local state file and the selected backend.
pub fn build_flow(config: &AppConfig, offline: bool) -> Result<(FlowController, BackendMode)> {
    let state_file = FrivoloPaths::local_state_file(config.storage.data_dir.as_deref())?;
    info!("[Startup] Local state at {}", state_file.display());
    let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(state_file));

    let ((profiles, searches), mode) = repositories(config, offline)?;
    info!("[Startup] Backend: {}", mode);

    let flow = FlowController::new(
        IdentityProvider::new(store.clone()),
        profiles,
        searches,
        Arc::new(LocalProfileCache::new(store)),
    );
    Ok((flow, mode))
}
