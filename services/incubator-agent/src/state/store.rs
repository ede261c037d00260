//! JSON file store for remembered incubator usage.
//!
//! The file is a plain JSON array of `{"IncubatorId", "PokemonId"}` objects,
//! rewritten wholesale on every save.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hatchery_reconcile::{AssignmentDigest, AssignmentRecord};
use thiserror::Error;
use tracing::debug;

/// File name of the usage file inside the profile's `temp` directory.
pub const USAGE_FILE_NAME: &str = "incubators.json";

/// Errors from usage store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create directory {path:?}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("corrupt usage file {path:?}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize usage records: {0}")]
    Serialize(serde_json::Error),
}

impl StoreError {
    /// Returns true if the file exists but could not be parsed.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

/// Usage store bound to one file.
#[derive(Debug, Clone)]
pub struct UsageStore {
    path: PathBuf,
}

impl UsageStore {
    /// Create a store for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at `<profile_dir>/temp/incubators.json`.
    pub fn in_profile(profile_dir: impl AsRef<Path>) -> Self {
        Self::new(profile_dir.as_ref().join("temp").join(USAGE_FILE_NAME))
    }

    /// Path of the usage file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load remembered assignments.
    ///
    /// Returns an empty list if the file doesn't exist or is empty.
    /// Returns an error if the file exists but is invalid.
    pub fn load(&self) -> Result<Vec<AssignmentRecord>, StoreError> {
        self.ensure_parent()?;

        if !self.path.exists() {
            debug!(path = %self.path.display(), "No usage file, starting fresh");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<AssignmentRecord> =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            path = %self.path.display(),
            record_count = records.len(),
            "Loaded usage file"
        );

        Ok(records)
    }

    /// Replace the stored assignments with `records`.
    ///
    /// Uses write-to-temp + rename so readers never see a partial file.
    pub fn save(&self, records: &[AssignmentRecord]) -> Result<(), StoreError> {
        self.ensure_parent()?;

        let content = serde_json::to_string(records).map_err(StoreError::Serialize)?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, content).map_err(|source| StoreError::Write {
            path: tmp_path.clone(),
            source,
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(
            path = %self.path.display(),
            record_count = records.len(),
            digest = %AssignmentDigest::of(records),
            "Saved usage file"
        );

        Ok(())
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatchery_id::{ItemId, SlotId};
    use tempfile::TempDir;

    fn rec(slot: &str, item: u64) -> AssignmentRecord {
        AssignmentRecord::new(SlotId::parse(slot).unwrap(), ItemId::new(item))
    }

    #[test]
    fn test_load_missing_file_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = UsageStore::in_profile(dir.path().join("profile"));

        let records = store.load().unwrap();
        assert!(records.is_empty());
        assert!(dir.path().join("profile").join("temp").is_dir());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = UsageStore::in_profile(dir.path());
        let records = vec![rec("inc_a", 1), rec("inc_b", 2)];

        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = UsageStore::in_profile(dir.path());

        store.save(&[rec("inc_a", 1), rec("inc_b", 2)]).unwrap();
        store.save(&[rec("inc_c", 3)]).unwrap();

        assert_eq!(store.load().unwrap(), vec![rec("inc_c", 3)]);
    }

    #[test]
    fn test_save_empty_list() {
        let dir = TempDir::new().unwrap();
        let store = UsageStore::in_profile(dir.path());

        store.save(&[]).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_format() {
        let dir = TempDir::new().unwrap();
        let store = UsageStore::in_profile(dir.path());

        store.save(&[rec("inc_a", 42)]).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"[{"IncubatorId":"inc_a","PokemonId":42}]"#);
    }

    #[test]
    fn test_load_empty_file() {
        let dir = TempDir::new().unwrap();
        let store = UsageStore::in_profile(dir.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "  \n").unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let store = UsageStore::in_profile(dir.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(err.is_corrupt());
        assert!(err.to_string().contains("incubators.json"));
    }
}
