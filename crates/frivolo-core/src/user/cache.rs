//! Local profile cache trait.

use serde::{Deserialize, Serialize};

use super::model::{ProfileDraft, UserProfile};
use crate::error::Result;

/// What the local cache holds for the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CachedProfile {
    /// A profile that passes validation and can drive the calculator.
    Complete(UserProfile),
    /// A profile written by an older schema that lacks required fields.
    /// The wizard should be pre-filled with it.
    Incomplete(ProfileDraft),
}

/// Non-authoritative local mirror of the user's profile.
///
/// Injected into the flow controller so it can be replaced by an in-memory
/// implementation in tests.
pub trait ProfileCache: Send + Sync {
    /// Loads the cached profile.
    ///
    /// Unreadable entries are cleared and reported as `None`.
    fn load(&self) -> Option<CachedProfile>;

    /// Replaces the cached profile.
    fn save(&self, profile: &UserProfile) -> Result<()>;

    /// Removes the cached profile.
    fn clear(&self) -> Result<()>;
}
