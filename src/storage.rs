// File: ./src/storage.rs
// Key-value persistence backends for the event snapshot.
use anyhow::{Context, Result};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A durable store of text values under string keys.
///
/// Writes replace the whole value; there is no partial update.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path used for `key`. Only alphanumerics, `-` and `_` survive in the file name.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        self.dir.join(format!("{}.json", safe_key))
    }

    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive lock on a sidecar `.lock` file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: write to a .tmp file then rename over the target.
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Self::with_lock(&path, || {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            Ok(Some(contents))
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        Self::with_lock(&path, || {
            Self::atomic_write(&path, value)
                .with_context(|| format!("Failed to write {:?}", path))
        })
    }
}

/// Process-local store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sheetcal_{}_{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_file_store_roundtrip_and_overwrite() {
        let dir = temp_dir("store");
        let store = FileStore::new(&dir);

        assert_eq!(store.get("calendarEventsV1").unwrap(), None);

        store.set("calendarEventsV1", "[1]").unwrap();
        assert_eq!(store.get("calendarEventsV1").unwrap().as_deref(), Some("[1]"));

        store.set("calendarEventsV1", "[2]").unwrap();
        assert_eq!(store.get("calendarEventsV1").unwrap().as_deref(), Some("[2]"));

        // No temp file is left behind after the rename.
        assert!(!store.path_for("calendarEventsV1").with_extension("tmp").exists());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_key_is_sanitized() {
        let store = FileStore::new("/data");
        assert_eq!(store.path_for("../etc/passwd"), PathBuf::from("/data/etcpasswd.json"));
        assert_eq!(store.path_for("calendarEventsV1"), PathBuf::from("/data/calendarEventsV1.json"));
    }

    #[test]
    fn test_locking_concurrency() {
        let dir = temp_dir("lock");
        fs::create_dir_all(&dir).unwrap();
        let file_path = dir.join("counter.json");
        FileStore::atomic_write(&file_path, "0").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let p = file_path.clone();
                thread::spawn(move || {
                    FileStore::with_lock(&p, || {
                        let n: u32 = fs::read_to_string(&p)?.trim().parse()?;
                        FileStore::atomic_write(&p, (n + 1).to_string())?;
                        Ok(())
                    })
                    .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "8");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
    }
}
