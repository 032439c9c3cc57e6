//! Local file storage.
//!
//! - `atomic_toml`: crash-safe TOML file with an exclusive update lock
//! - `key_value`: `KeyValueStore` implementations (file-backed and in-memory)

pub mod atomic_toml;
pub mod key_value;

pub use atomic_toml::AtomicTomlFile;
pub use key_value::{FileKeyValueStore, MemoryKeyValueStore};
