//! Domain layer for Frivolo.
//!
//! Converts a product price into the hours of work it costs, based on the
//! user's salary and schedule. This crate holds the models, the pure
//! calculator and the traits the outer layers implement.

pub mod config;
pub mod error;
pub mod identity;
pub mod search;
pub mod storage;
pub mod user;
pub mod wage;

// Re-export common error type
pub use error::{CalculationError, FrivoloError, Result, ValidationError};
