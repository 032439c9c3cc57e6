//! Data transfer objects.
//!
//! - `user_profile`: schema-versioned profile kept in the local cache
//! - `rows`: JSON rows of the remote `users` and `saved_searches` tables

pub mod rows;
pub mod user_profile;

pub use rows::{SearchInsert, SearchRow, UserKey, UserRow, UserWrite};
pub use user_profile::{
    USER_PROFILE_ENTITY, UserProfileDTO, UserProfileV1_0, UserProfileV1_1,
    create_user_profile_migrator, to_flat_json,
};
