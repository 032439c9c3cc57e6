pub mod config_service;
pub mod dto;
pub mod memory;
pub mod paths;
pub mod profile_cache;
pub mod rest;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::memory::{MemoryProfileRepository, MemorySearchRepository};
pub use crate::paths::FrivoloPaths;
pub use crate::profile_cache::LocalProfileCache;
pub use crate::rest::{RestClient, RestProfileRepository, RestSearchRepository};
pub use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
