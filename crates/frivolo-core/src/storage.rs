//! Local key-value storage interface.
//!
//! The application keeps two small string entries on the user's machine:
//! the generated identity and the serialized profile. Anything that can
//! store strings under a key can back them.

use crate::error::Result;

/// Key holding the generated user identity.
pub const USER_ID_KEY: &str = "frivoloUserId";

/// Key holding the serialized user profile.
pub const USER_DATA_KEY: &str = "frivoloUserData";

/// A persistent string-to-string store.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
