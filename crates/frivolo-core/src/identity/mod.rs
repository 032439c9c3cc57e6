//! Identity domain module.
//!
//! - `model`: the `Identity` token
//! - `provider`: lazy generation and persistence of the token

mod model;
mod provider;

pub use model::Identity;
pub use provider::{IDENTITY_PREFIX, IdentityProvider, generate_identity, to_base36};
