//! File-based state storage for Grain.
//!
//! State is stored as pretty-printed JSON in `~/.grain/data.json`, with
//! timestamped copies under `~/.grain/backups/`. Atomic writes are achieved
//! via temp file + rename pattern.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::config::{backups_dir, data_path, grain_home};
use crate::core::AppState;
use crate::error::{GrainError, Result};
use crate::storage::StateStore;
use crate::util::read_to_string_limited;

/// Prefix shared by every backup file name.
pub const BACKUP_PREFIX: &str = "backup_";

/// `strftime` pattern for the timestamp part of a backup file name.
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// File-based state storage.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    /// The `data.json` document.
    data_path: PathBuf,
    /// Directory holding backup copies.
    backups_dir: PathBuf,
}

impl FileStateStore {
    /// Create a store rooted at the default Grain home.
    ///
    /// Uses `~/.grain/` or `$GRAIN_HOME/`.
    pub fn new() -> Result<Self> {
        let home = grain_home().ok_or_else(|| {
            GrainError::config("Could not determine grain home (no home directory)")
        })?;
        Ok(Self::with_home(home))
    }

    /// Create a store rooted at a custom home directory.
    pub fn with_home(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref();
        Self::with_paths(data_path(home), backups_dir(home))
    }

    /// Create a store with explicit data file and backups directory.
    pub fn with_paths(data_path: impl Into<PathBuf>, backups_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            backups_dir: backups_dir.into(),
        }
    }

    /// Path of the data file.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Path of the backups directory.
    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Get the path for a temp file used during atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .data_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data.json".to_string());
        self.data_path.with_file_name(format!(".{}.tmp", name))
    }

    /// Write `content` to the data file atomically using temp file + rename.
    fn atomic_write(&self, content: &[u8]) -> Result<()> {
        if let Some(parent) = self.data_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| GrainError::storage(parent, e))?;
            }
        }

        let temp_path = self.temp_path();
        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| GrainError::storage(&temp_path, e))?;
            file.write_all(content)
                .map_err(|e| GrainError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| GrainError::storage(&temp_path, e))?;
        }

        // Rename temp file to final path (atomic on POSIX)
        fs::rename(&temp_path, &self.data_path)
            .map_err(|e| GrainError::storage(&self.data_path, e))?;

        Ok(())
    }

    /// Copy the current data file to `backups/backup_<timestamp>.json`.
    ///
    /// Returns the path of the new backup. Fails if no data file exists yet,
    /// or if a backup with the same timestamp is already there.
    pub fn backup(&self, now: NaiveDateTime) -> Result<PathBuf> {
        if !self.data_path.exists() {
            return Err(GrainError::validation(format!(
                "no data file to back up at {}",
                self.data_path.display()
            )));
        }

        fs::create_dir_all(&self.backups_dir)
            .map_err(|e| GrainError::storage(&self.backups_dir, e))?;

        let name = format!(
            "{}{}.json",
            BACKUP_PREFIX,
            now.format(BACKUP_TIMESTAMP_FORMAT)
        );
        let target = self.backups_dir.join(&name);
        if target.exists() {
            return Err(GrainError::validation(format!(
                "backup '{}' already exists, try again in a second",
                name
            )));
        }
        fs::copy(&self.data_path, &target).map_err(|e| GrainError::storage(&target, e))?;

        tracing::info!(path = %target.display(), "created backup");
        Ok(target)
    }

    /// Replace the data file with the named backup.
    ///
    /// `name` must be a bare file name inside the backups directory. The
    /// backup is parsed before anything is overwritten, so a corrupt backup
    /// leaves the current data intact.
    pub fn restore(&self, name: &str) -> Result<PathBuf> {
        let source = self.backup_path(name)?;
        if !source.is_file() {
            return Err(GrainError::validation(format!(
                "backup '{}' does not exist",
                name
            )));
        }

        let content = read_to_string_limited(&source)?;
        serde_json::from_str::<AppState>(&content).map_err(|e| {
            GrainError::validation(format!("backup '{}' is not valid grain data: {}", name, e))
        })?;

        self.atomic_write(content.as_bytes())?;
        tracing::info!(backup = name, "restored backup");
        Ok(source)
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&self.backups_dir).map_err(|e| GrainError::storage(&self.backups_dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GrainError::storage(&self.backups_dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(BACKUP_PREFIX) && name.ends_with(".json") {
                names.push(name);
            }
        }

        // Timestamps sort lexicographically
        names.sort_unstable_by(|a, b| b.cmp(a));
        Ok(names)
    }

    /// Resolve a backup name, rejecting anything that is not a bare file name.
    fn backup_path(&self, name: &str) -> Result<PathBuf> {
        let is_bare = !name.is_empty()
            && Path::new(name).file_name().map(|n| n == name).unwrap_or(false)
            && !name.contains(['/', '\\']);
        if !is_bare {
            return Err(GrainError::validation(format!(
                "invalid backup name '{}': expected a file name such as backup_2024-06-03_09-00-00.json",
                name
            )));
        }
        Ok(self.backups_dir.join(name))
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<AppState> {
        if !self.data_path.exists() {
            return Ok(AppState::new());
        }

        let content = read_to_string_limited(&self.data_path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %self.data_path.display(), "data file is empty");
            return Ok(AppState::new());
        }

        let state: AppState = serde_json::from_str(&content).map_err(|e| {
            GrainError::serde(format!("{}: {}", self.data_path.display(), e))
        })?;
        Ok(state)
    }

    fn save(&self, state: &AppState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        self.atomic_write(json.as_bytes())
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.data_path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::{sample_state, test_state_store_roundtrip};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStateStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::with_home(dir.path());
        (store, dir)
    }

    fn timestamp(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 4)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    #[test]
    fn test_file_state_store_roundtrip() {
        let (store, _dir) = create_test_store();
        test_state_store_roundtrip(&store);
    }

    #[test]
    fn test_paths_follow_home() {
        let (store, dir) = create_test_store();
        assert_eq!(store.data_path(), dir.path().join("data.json"));
        assert_eq!(store.backups_dir(), dir.path().join("backups"));
    }

    #[test]
    fn test_load_empty_file_is_fresh_state() {
        let (store, _dir) = create_test_store();
        fs::write(store.data_path(), "  \n").unwrap();
        assert_eq!(store.load().unwrap(), AppState::new());
    }

    #[test]
    fn test_load_invalid_json_is_serde_error() {
        let (store, _dir) = create_test_store();
        fs::write(store.data_path(), "{not json").unwrap();

        let result = store.load();
        assert!(matches!(result, Err(GrainError::Serde { .. })));
    }

    #[test]
    fn test_save_skips_empty_buckets() {
        let (store, _dir) = create_test_store();
        let mut state = sample_state();
        let empty_day = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        state.logs.find_or_create_day(empty_day);
        store.save(&state).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.data_path()).unwrap()).unwrap();
        assert_eq!(json["logs"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_save_creates_missing_parent() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::with_home(dir.path().join("nested"));
        store.save(&sample_state()).unwrap();
        assert!(store.data_path().exists());
    }

    #[test]
    fn test_temp_file_cleaned_up() {
        let (store, _dir) = create_test_store();
        store.save(&sample_state()).unwrap();
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_backup_without_data_fails() {
        let (store, _dir) = create_test_store();
        let result = store.backup(timestamp(9, 0, 0));
        assert!(matches!(result, Err(GrainError::Validation { .. })));
    }

    #[test]
    fn test_backup_copies_data_verbatim() {
        let (store, _dir) = create_test_store();
        store.save(&sample_state()).unwrap();

        let path = store.backup(timestamp(9, 5, 7)).unwrap();
        assert!(path.ends_with("backup_2024-06-04_09-05-07.json"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            fs::read_to_string(store.data_path()).unwrap()
        );
    }

    #[test]
    fn test_backup_in_same_second_keeps_first() {
        let (store, _dir) = create_test_store();
        store.save(&sample_state()).unwrap();
        let first = store.backup(timestamp(9, 5, 7)).unwrap();
        let original = fs::read_to_string(&first).unwrap();

        store.save(&AppState::new()).unwrap();
        let result = store.backup(timestamp(9, 5, 7));
        assert!(matches!(result, Err(GrainError::Validation { .. })));
        assert_eq!(fs::read_to_string(&first).unwrap(), original);
        assert_eq!(store.list_backups().unwrap().len(), 1);
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (store, _dir) = create_test_store();
        store.save(&sample_state()).unwrap();
        store.backup(timestamp(9, 0, 0)).unwrap();
        store.backup(timestamp(18, 30, 0)).unwrap();
        store.backup(timestamp(12, 0, 0)).unwrap();
        fs::write(store.backups_dir().join("notes.txt"), "x").unwrap();

        let names = store.list_backups().unwrap();
        assert_eq!(
            names,
            vec![
                "backup_2024-06-04_18-30-00.json",
                "backup_2024-06-04_12-00-00.json",
                "backup_2024-06-04_09-00-00.json",
            ]
        );
    }

    #[test]
    fn test_list_backups_without_dir() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::with_paths(dir.path().join("data.json"), dir.path().join("none"));
        assert!(store.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_restore_replaces_data() {
        let (store, _dir) = create_test_store();
        let original = sample_state();
        store.save(&original).unwrap();
        let backup = store.backup(timestamp(9, 0, 0)).unwrap();

        store.save(&AppState::new()).unwrap();
        let name = backup.file_name().unwrap().to_str().unwrap();
        store.restore(name).unwrap();

        assert_eq!(store.load().unwrap(), original);
    }

    #[test]
    fn test_restore_rejects_paths() {
        let (store, _dir) = create_test_store();
        for name in ["../data.json", "sub/backup.json", "", ".."] {
            let result = store.restore(name);
            assert!(
                matches!(result, Err(GrainError::Validation { .. })),
                "accepted {:?}",
                name
            );
        }
    }

    #[test]
    fn test_restore_missing_backup() {
        let (store, _dir) = create_test_store();
        let err = store.restore("backup_1999-01-01_00-00-00.json").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_restore_corrupt_backup_keeps_data() {
        let (store, _dir) = create_test_store();
        let original = sample_state();
        store.save(&original).unwrap();
        fs::create_dir_all(store.backups_dir()).unwrap();
        fs::write(store.backups_dir().join("backup_bad.json"), "[1, 2").unwrap();

        assert!(store.restore("backup_bad.json").is_err());
        assert_eq!(store.load().unwrap(), original);
    }
}
