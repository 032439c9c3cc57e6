//! Saved search domain module.
//!
//! A saved search pairs a product name and cost with the work duration and
//! hourly wage computed at save time. Both derived values are snapshots:
//! they are never recomputed when the profile changes later.

mod model;
pub mod repository;

pub use model::{NewSearch, SearchRecord};
pub use repository::SearchRepository;
