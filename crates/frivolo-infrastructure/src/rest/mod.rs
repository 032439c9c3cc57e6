//! Remote stores over a PostgREST-style HTTP interface (e.g. Supabase).
//!
//! Two narrow repositories share one [`RestClient`]; neither exposes a
//! generic query builder to the domain.

mod client;
mod profile_repository;
mod search_repository;

pub use client::RestClient;
pub use profile_repository::RestProfileRepository;
pub use search_repository::RestSearchRepository;

pub(crate) const USERS_TABLE: &str = "users";
pub(crate) const SAVED_SEARCHES_TABLE: &str = "saved_searches";
