//! Profile repository trait.
//!
//! Defines the interface for remote profile persistence operations.

use async_trait::async_trait;

use super::model::{StoredProfile, UserProfile};
use crate::error::Result;
use crate::identity::Identity;

/// An abstract repository for the remote copy of a user's profile.
///
/// This trait isolates the backend choice from the domain logic. It exposes
/// only upsert and fetch; profiles are never deleted.
///
/// # Implementation Notes
///
/// Implementations stamp `updated_at` with the current time on every upsert.
/// Whether the existence check and the write are atomic is up to the
/// implementation (see the upsert strategy in the configuration).
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Inserts or updates the full profile keyed by `identity`.
    ///
    /// # Returns
    ///
    /// - `Ok(StoredProfile)`: The record as stored by the backend
    /// - `Err(_)`: Network or backend failure
    async fn upsert_profile(
        &self,
        identity: &Identity,
        profile: &UserProfile,
    ) -> Result<StoredProfile>;

    /// Fetches the stored profile for `identity`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StoredProfile))`: Profile found
    /// - `Ok(None)`: No profile stored for this identity
    /// - `Err(_)`: Network or backend failure
    async fn fetch_profile(&self, identity: &Identity) -> Result<Option<StoredProfile>>;
}
