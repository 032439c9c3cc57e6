//! Unified path management for Frivolo files.
//!
//! ```text
//! ~/.config/frivolo/           # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/frivolo/      # Data directory
//! └── local_state.toml         # Identity and cached profile
//! ```

use std::path::{Path, PathBuf};

use frivolo_core::error::{FrivoloError, Result};

const APP_DIR: &str = "frivolo";
const CONFIG_FILE: &str = "config.toml";
const LOCAL_STATE_FILE: &str = "local_state.toml";

pub struct FrivoloPaths;

impl FrivoloPaths {
    /// Platform config directory, e.g. `~/.config/frivolo/`.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| FrivoloError::config("Cannot find config directory"))
    }

    /// Platform data directory, e.g. `~/.local/share/frivolo/`.
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| FrivoloError::config("Cannot find data directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Local state file inside `data_dir`, or inside the platform data
    /// directory when no override is given.
    pub fn local_state_file(data_dir: Option<&Path>) -> Result<PathBuf> {
        let dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => Self::data_dir()?,
        };
        Ok(dir.join(LOCAL_STATE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_state_file_respects_override() {
        let path = FrivoloPaths::local_state_file(Some(Path::new("/tmp/frivolo-test"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/frivolo-test/local_state.toml"));
    }

    #[test]
    fn test_config_file_name() {
        if let Ok(path) = FrivoloPaths::config_file() {
            assert!(path.ends_with("frivolo/config.toml"));
        }
    }
}
