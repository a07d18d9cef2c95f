use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::JournalResult;

pub trait Storage {
    fn get(&self, key: &str) -> JournalResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> JournalResult<()>;
}

/// One `<key>.json` file per key under a directory. Writes go to a temp
/// file that is flushed and closed before being renamed over the target.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> JournalResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        debug!("Read {} bytes from {}", content.len(), path.display());
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> JournalResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(value.as_bytes())?;
            f.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    fail_writes: bool,
    refused_key: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Fails writes to `key` only.
    pub fn refuse_key(&mut self, key: &str) {
        self.refused_key = Some(key.to_string());
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> JournalResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> JournalResult<()> {
        if self.fail_writes || self.refused_key.as_deref() == Some(key) {
            return Err(crate::error::JournalError::Storage(format!(
                "write to '{}' refused",
                key
            )));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trip_and_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = FileStorage::new(dir.path().join("nested"));
        assert_eq!(s.get("missing").unwrap(), None);

        s.set("k", "[1,2]").unwrap();
        assert_eq!(s.get("k").unwrap().as_deref(), Some("[1,2]"));
        assert!(!dir.path().join("nested/k.json.tmp").exists());

        s.set("k", "[]").unwrap();
        assert_eq!(s.get("k").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn memory_storage_can_refuse_writes() {
        let mut s = MemoryStorage::new();
        s.set("a", "1").unwrap();
        s.fail_writes(true);
        assert!(s.set("a", "2").is_err());
        assert_eq!(s.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn memory_storage_can_refuse_one_key() {
        let mut s = MemoryStorage::new();
        s.refuse_key("goal");
        assert!(s.set("goal", "{}").is_err());
        s.set("trades", "[]").unwrap();
        assert_eq!(s.get("goal").unwrap(), None);
    }
}
