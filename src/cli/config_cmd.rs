//! Config command for Grain.
//!
//! Opens `config.toml` in the user's editor. Changes take effect on the next
//! run.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::config::Config;
use crate::error::{GrainError, Result};

/// Editors tried in order when `$EDITOR` is unset.
pub const FALLBACK_EDITORS: &[&str] = &["vim", "nano", "code"];

/// Options for the config command.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the config command.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigOutput {
    /// The file that was edited.
    pub path: PathBuf,
    /// The editor command used.
    pub editor: String,
}

/// Pick an editor: `$EDITOR` if set, else the first fallback found on `PATH`.
pub fn resolve_editor(editor_env: Option<String>, path_env: Option<OsString>) -> Option<String> {
    if let Some(editor) = editor_env.filter(|e| !e.trim().is_empty()) {
        return Some(editor);
    }

    let path_env = path_env?;
    let dirs: Vec<PathBuf> = env::split_paths(&path_env).collect();
    FALLBACK_EDITORS
        .iter()
        .find(|name| dirs.iter().any(|dir| dir.join(name).is_file()))
        .map(|name| name.to_string())
}

/// The config command implementation.
pub struct ConfigCommand {
    config_path: PathBuf,
    config: Config,
}

impl ConfigCommand {
    /// Create a new config command for the file at `config_path`.
    pub fn new(config_path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            config_path: config_path.into(),
            config,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Open the config file in `$EDITOR` (or a fallback) and wait for it.
    ///
    /// A missing file is created from the current settings first.
    pub fn run(&self) -> Result<ConfigOutput> {
        let editor = resolve_editor(env::var("EDITOR").ok(), env::var_os("PATH")).ok_or_else(|| {
            GrainError::config(format!(
                "EDITOR environment variable not set and common editors (vim, nano, code) not found. Please edit manually: {}",
                self.config_path.display()
            ))
        })?;

        if !self.config_path.exists() {
            self.config.save(&self.config_path)?;
        }

        open_in_editor(&editor, &self.config_path)?;
        Ok(ConfigOutput {
            path: self.config_path.clone(),
            editor,
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ConfigOutput, options: &ConfigOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            "Editor closed. Configuration changes will be applied the next time you run grain."
                .to_string()
        }
    }
}

/// Run `editor` on `path`, inheriting the terminal. `editor` may carry
/// arguments, e.g. `code --wait`.
fn open_in_editor(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| GrainError::config("editor command is empty"))?;

    tracing::debug!(editor, path = %path.display(), "opening editor");
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| GrainError::storage(program, e))?;

    if !status.success() {
        return Err(GrainError::config(format!(
            "editor '{}' exited with {}",
            editor, status
        )));
    }
    Ok(())
}
