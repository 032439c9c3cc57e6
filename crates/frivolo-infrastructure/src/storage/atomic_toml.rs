//! Atomic TOML file operations.
//!
//! Writes go to a sibling temp file which is fsynced and renamed over the
//! target, so a reader never observes a half-written document.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use frivolo_core::error::{FrivoloError, Result};

/// A handle to a TOML document on disk.
///
/// - Saves are all-or-nothing (tmp file + rename)
/// - `update` holds an exclusive lock for the whole read-modify-write
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Serializes `data` and replaces the file atomically.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Read-modify-write under an exclusive file lock.
    ///
    /// `default_value` is used when the file does not exist yet. Nothing is
    /// written if `f` returns an error.
    pub fn update<F, R>(&self, default_value: T, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let result = f(&mut data)?;
        self.save(&data)?;

        Ok(result)
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| FrivoloError::io("path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| FrivoloError::io("path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock on `<path>.lock`, released on drop.
///
/// The lock file is never removed: every writer must contend on the same inode.
struct FileLock {
    #[cfg_attr(not(unix), allow(dead_code))]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| {
                FrivoloError::data_access(format!("Failed to acquire lock: {}", e))
            })?;
        }

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use fs2::FileExt;
            let _ = self.file.unlock();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    type Entries = BTreeMap<String, String>;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Entries>::new(temp_dir.path().join("state.toml"));

        let mut entries = Entries::new();
        entries.insert("frivoloUserId".to_string(), "user_abc_123".to_string());
        file.save(&entries).unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Entries>::new(temp_dir.path().join("missing.toml"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_load_garbage_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let file = AtomicTomlFile::<Entries>::new(path);
        assert!(file.load().unwrap_err().is_serialization());
    }

    #[test]
    fn test_update_returns_closure_result() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Entries>::new(temp_dir.path().join("nested/state.toml"));

        let previous = file
            .update(Entries::new(), |entries| {
                Ok(entries.insert("k".to_string(), "v1".to_string()))
            })
            .unwrap();
        assert_eq!(previous, None);

        let previous = file
            .update(Entries::new(), |entries| {
                Ok(entries.insert("k".to_string(), "v2".to_string()))
            })
            .unwrap();
        assert_eq!(previous.as_deref(), Some("v1"));
        assert_eq!(file.load().unwrap().unwrap()["k"], "v2");
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        let file = AtomicTomlFile::<Entries>::new(path.clone());

        let result: Result<()> = file.update(Entries::new(), |entries| {
            entries.insert("k".to_string(), "v".to_string());
            Err(FrivoloError::internal("abort"))
        });

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_no_temp_or_lock_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        let file = AtomicTomlFile::<Entries>::new(path.clone());

        file.update(Entries::new(), |_| Ok(())).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join(".state.toml.tmp").exists());
        assert!(!temp_dir.path().join("state.lock").exists());
    }

    #[test]
    fn test_lock_file_is_kept_between_updates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        let file = AtomicTomlFile::<Entries>::new(path.clone());

        file.update(Entries::new(), |entries| {
            entries.insert("a".to_string(), "1".to_string());
            Ok(())
        })
        .unwrap();

        assert!(path.with_extension("lock").exists());
    }

    #[test]
    fn test_concurrent_updates_keep_every_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");

        let writers: Vec<_> = (0..4)
            .map(|writer| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let file = AtomicTomlFile::<Entries>::new(path);
                    for i in 0..25 {
                        file.update(Entries::new(), |entries| {
                            entries.insert(format!("w{}_{}", writer, i), i.to_string());
                            Ok(())
                        })
                        .unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let loaded = AtomicTomlFile::<Entries>::new(path).load().unwrap().unwrap();
        assert_eq!(loaded.len(), 100);
    }
}
