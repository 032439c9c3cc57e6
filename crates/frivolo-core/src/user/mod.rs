//! User domain module.
//!
//! This module contains the user profile model, its validation rules, and
//! the interfaces for remote persistence and local caching.
//!
//! # Module Structure
//!
//! - `model`: `UserProfile`, `ProfileDraft`, `StoredProfile`, `ProfileField`
//! - `validation`: field rules and draft completion
//! - `repository`: remote `ProfileRepository` trait
//! - `cache`: local `ProfileCache` trait

mod cache;
mod model;
pub mod repository;
mod validation;

// Re-export public API
pub use cache::{CachedProfile, ProfileCache};
pub use model::{
    DEFAULT_COUNTRY, JOB_SUGGESTIONS, ProfileDraft, ProfileField, StoredProfile, UserProfile,
};
pub use repository::ProfileRepository;
pub use validation::{MAX_DAYS_PER_WEEK, MAX_HOURS_PER_DAY, is_valid_email, validate_field};
