//! Goal command for Grain.
//!
//! Shows the weekly study goal, or sets it in `config.toml`.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::{GrainError, Result};

/// Options for the goal command.
#[derive(Debug, Clone, Default)]
pub struct GoalOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the goal command.
#[derive(Debug, Clone, Serialize)]
pub struct GoalOutput {
    /// The weekly goal now in effect.
    pub weekly_goal: u32,
    /// Whether the goal was changed.
    pub updated: bool,
}

/// The goal command implementation.
pub struct GoalCommand {
    config_path: PathBuf,
    config: Config,
}

impl GoalCommand {
    /// Create a new goal command for the config file at `config_path`.
    pub fn new(config_path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            config_path: config_path.into(),
            config,
        }
    }

    /// Show the goal, or persist `new_goal` when given.
    ///
    /// Only the file's own values are rewritten, so environment overrides
    /// in effect for this run are never baked into `config.toml`.
    pub fn run(&self, new_goal: Option<u32>) -> Result<GoalOutput> {
        let Some(goal) = new_goal else {
            return Ok(GoalOutput {
                weekly_goal: self.config.weekly_goal,
                updated: false,
            });
        };

        if !Config::is_valid_weekly_goal(goal) {
            return Err(GrainError::validation(format!(
                "invalid goal amount: '{}'. Please provide a positive number",
                goal
            )));
        }

        let mut file_config = if self.config_path.exists() {
            Config::load_from_file(&self.config_path)?
        } else {
            Config::default()
        };
        file_config.weekly_goal = goal;
        file_config.save(&self.config_path)?;
        tracing::info!(weekly_goal = goal, "updated weekly goal");

        Ok(GoalOutput {
            weekly_goal: goal,
            updated: true,
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &GoalOutput, options: &GoalOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.updated {
            format!(
                "🎯 Weekly study goal updated to: {} credits",
                output.weekly_goal
            )
        } else {
            format!(
                "🎯 Current weekly study goal: {} credits",
                output.weekly_goal
            )
        }
    }
}
