//! Identity provider.
//!
//! Produces a stable opaque identifier on first use and persists it in the
//! local key-value store so later sessions reuse it.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info};

use super::model::Identity;
use crate::error::Result;
use crate::storage::{KeyValueStore, USER_ID_KEY};

/// Prefix of every generated identity.
pub const IDENTITY_PREFIX: &str = "user_";

const RANDOM_FRAGMENT_LEN: usize = 9;
const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Reads or lazily creates the identity stored under [`USER_ID_KEY`].
#[derive(Clone)]
pub struct IdentityProvider {
    store: Arc<dyn KeyValueStore>,
}

impl IdentityProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the stored identity, generating and persisting one if absent.
    ///
    /// Repeated calls return the same value for as long as the underlying
    /// store keeps the entry.
    pub fn get_or_create(&self) -> Result<Identity> {
        if let Some(existing) = self.store.get(USER_ID_KEY)?
            && !existing.trim().is_empty()
        {
            debug!("[Identity] Reusing stored identity");
            return Ok(Identity::new(existing));
        }

        let generated = generate_identity(&mut rand::thread_rng(), Utc::now().timestamp_millis());
        self.store.set(USER_ID_KEY, &generated)?;
        info!("[Identity] Generated new identity: {}", generated);
        Ok(Identity::new(generated))
    }
}

/// Builds `user_<random base-36 fragment>_<base-36 timestamp>`.
///
/// Uniqueness is probabilistic only.
pub fn generate_identity<R: Rng + ?Sized>(rng: &mut R, timestamp_millis: i64) -> String {
    let fragment: String = (0..RANDOM_FRAGMENT_LEN)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
        .collect();

    format!(
        "{}{}_{}",
        IDENTITY_PREFIX,
        fragment,
        to_base36(timestamp_millis.unsigned_abs())
    )
}

/// Lowercase base-36 rendering of an unsigned integer.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
