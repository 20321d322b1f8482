//! Backup, backups and restore commands for Grain.
//!
//! Backups are verbatim copies of `data.json` under `backups/`. Restoring
//! one replaces the data file, then reloads it so the streak is recomputed
//! for today before saving.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;

use crate::cli::format::header;
use crate::cli::load_state;
use crate::config::Config;
use crate::error::Result;
use crate::storage::{FileStateStore, StateStore};

/// Options for the backup commands.
#[derive(Debug, Clone, Default)]
pub struct BackupOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the backup commands.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BackupOutput {
    /// A new backup was written.
    Created { path: PathBuf },
    /// Existing backups, newest first.
    Listed { backups: Vec<String> },
    /// The data file was replaced from a backup.
    Restored { backup: String, streak: u32 },
    /// The user declined the restore.
    Cancelled,
}

/// The backup command implementation.
pub struct BackupCommand {
    store: FileStateStore,
    config: Config,
    now: DateTime<FixedOffset>,
}

impl BackupCommand {
    /// Create a new backup command.
    pub fn new(store: FileStateStore, config: Config) -> Self {
        Self {
            store,
            config,
            now: Local::now().fixed_offset(),
        }
    }

    /// Use a fixed clock instead of the wall clock.
    pub fn at(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = now;
        self
    }

    /// Write a timestamped copy of the data file.
    pub fn backup(&self) -> Result<BackupOutput> {
        let path = self.store.backup(self.now.naive_local())?;
        Ok(BackupOutput::Created { path })
    }

    /// List existing backups.
    pub fn list(&self) -> Result<BackupOutput> {
        Ok(BackupOutput::Listed {
            backups: self.store.list_backups()?,
        })
    }

    /// Restore the backup called `name` if `confirmed`.
    pub fn restore(&self, name: &str, confirmed: bool) -> Result<BackupOutput> {
        if !confirmed {
            return Ok(BackupOutput::Cancelled);
        }

        self.store.restore(name)?;

        let state = load_state(&self.store, &self.config, self.now.date_naive())?;
        self.store.save(&state)?;

        Ok(BackupOutput::Restored {
            backup: name.to_string(),
            streak: state.streak,
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &BackupOutput, options: &BackupOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &BackupOutput) -> String {
        match output {
            BackupOutput::Created { path } => {
                format!("🗃️ Backup saved to: {}", path.display())
            }
            BackupOutput::Listed { backups } if backups.is_empty() => {
                "No backups found.".to_string()
            }
            BackupOutput::Listed { backups } => {
                let mut lines = vec![header("🗃️ Backups")];
                lines.extend(backups.iter().cloned());
                lines.join("\n")
            }
            BackupOutput::Restored { backup, .. } => format!(
                "♻️ Data restored from {} and current stats recalculated.",
                backup
            ),
            BackupOutput::Cancelled => "Restore cancelled.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AppState, LogKind};
    use crate::engine::test_support::{at, day};
    use crate::engine::Ledger;
    use crate::error::GrainError;
    use tempfile::TempDir;

    fn seeded(dir: &TempDir) -> FileStateStore {
        let store = FileStateStore::with_home(dir.path());
        let mut state = AppState::new();
        let config = Config::default();
        let mut ledger = Ledger::new(&mut state, &config, day(2));
        ledger.add_log(LogKind::Study, 95, at(day(-7), 9)).unwrap();
        ledger.add_log(LogKind::Study, 5, at(day(1), 9)).unwrap();
        store.save(&state).unwrap();
        store
    }

    fn command(store: FileStateStore) -> BackupCommand {
        BackupCommand::new(store, Config::default()).at(at(day(2), 9))
    }

    #[test]
    fn test_backup_and_list() {
        let dir = TempDir::new().unwrap();
        let cmd = command(seeded(&dir));

        let output = cmd.backup().unwrap();
        let BackupOutput::Created { path } = &output else {
            panic!("expected Created, got {:?}", output);
        };
        assert!(path.ends_with("backup_2024-06-05_09-00-00.json"));
        assert!(cmd
            .format_output(&output, &BackupOptions::default())
            .starts_with("🗃️ Backup saved to: "));

        let listed = cmd.list().unwrap();
        let formatted = cmd.format_output(&listed, &BackupOptions::default());
        assert!(formatted.contains("backup_2024-06-05_09-00-00.json"));
    }

    #[test]
    fn test_list_empty() {
        let dir = TempDir::new().unwrap();
        let cmd = command(FileStateStore::with_home(dir.path()));
        let output = cmd.list().unwrap();
        assert_eq!(
            cmd.format_output(&output, &BackupOptions::default()),
            "No backups found."
        );
    }

    #[test]
    fn test_backup_without_data_fails() {
        let dir = TempDir::new().unwrap();
        let cmd = command(FileStateStore::with_home(dir.path()));
        assert!(matches!(cmd.backup(), Err(GrainError::Validation { .. })));
    }

    #[test]
    fn test_restore_recalculates_and_saves() {
        let dir = TempDir::new().unwrap();
        let store = seeded(&dir);
        let cmd = command(store.clone());
        let BackupOutput::Created { path } = cmd.backup().unwrap() else {
            panic!("expected Created");
        };
        let name = path.file_name().unwrap().to_str().unwrap().to_string();

        store.save(&AppState::new()).unwrap();
        let output = cmd.restore(&name, true).unwrap();

        assert!(matches!(output, BackupOutput::Restored { streak: 1, .. }));
        let restored = store.load().unwrap();
        assert_eq!(restored.logs.entries().count(), 2);
        // add_log never sets the streak; restore persists the recomputed one
        assert_eq!(restored.streak, 1);
    }

    #[test]
    fn test_restore_declined() {
        let dir = TempDir::new().unwrap();
        let cmd = command(seeded(&dir));
        let output = cmd.restore("anything.json", false).unwrap();
        assert!(matches!(output, BackupOutput::Cancelled));
        assert_eq!(
            cmd.format_output(&output, &BackupOptions::default()),
            "Restore cancelled."
        );
    }

    #[test]
    fn test_restore_rejects_path() {
        let dir = TempDir::new().unwrap();
        let cmd = command(seeded(&dir));
        let result = cmd.restore("../data.json", true);
        assert!(matches!(result, Err(GrainError::Validation { .. })));
    }

    #[test]
    fn test_format_output_json() {
        let dir = TempDir::new().unwrap();
        let cmd = command(seeded(&dir));
        cmd.backup().unwrap();
        let output = cmd.list().unwrap();
        let options = BackupOptions {
            json: true,
            ..Default::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &options)).unwrap();
        assert_eq!(value["action"], "listed");
        assert_eq!(value["backups"].as_array().unwrap().len(), 1);
    }
}
