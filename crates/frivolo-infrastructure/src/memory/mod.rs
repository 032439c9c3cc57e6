//! In-memory repositories.
//!
//! Used when no backend is configured (`--offline`) and as fakes in tests.
//! Both can be switched into an "unavailable" mode that fails every call
//! with a backend error.

mod profile_repository;
mod search_repository;

pub use profile_repository::MemoryProfileRepository;
pub use search_repository::MemorySearchRepository;

use frivolo_core::error::FrivoloError;

fn unavailable_error(store: &str) -> FrivoloError {
    FrivoloError::backend(Some(503), format!("{} is unavailable", store))
}
