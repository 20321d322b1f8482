//! First-run setup for Grain.
//!
//! When no `config.toml` exists yet, an interactive session asks for the
//! weekly goal and break allowance and saves them. Non-interactive runs fall
//! back to defaults without writing anything.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::cli::format::header;
use crate::config::{Config, DEFAULT_BREAK_START, DEFAULT_WEEKLY_GOAL};
use crate::error::{GrainError, Result};

/// Load the config, running the first-run prompt when the file is missing.
///
/// `interactive` should be true only when stdin is a terminal.
pub fn load_or_setup<R: BufRead, W: Write>(
    config_path: &Path,
    interactive: bool,
    input: &mut R,
    output: &mut W,
) -> Result<Config> {
    if !config_path.exists() && interactive {
        let config = prompt_initial_config(input, output)?;
        config.save(config_path)?;
        writeln!(output, "✨ Configuration saved to {}", config_path.display())
            .map_err(|e| GrainError::storage("<stdout>", e))?;
        tracing::info!(path = %config_path.display(), "wrote initial config");
    }
    // Env overrides still apply on top of whatever was just saved
    Config::load(config_path)
}

/// Ask for the weekly goal and break allowance.
///
/// Blank answers take the defaults. Unparseable answers, and a goal of 0,
/// take the defaults with a notice.
pub fn prompt_initial_config<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Config> {
    let io_err = |e| GrainError::storage("<stdout>", e);

    writeln!(output, "{}", header("👋 Welcome to Grain CLI!")).map_err(io_err)?;

    let weekly_goal = ask(
        input,
        output,
        &format!("Enter your study goal per week (default: {}): ", DEFAULT_WEEKLY_GOAL),
        DEFAULT_WEEKLY_GOAL,
        Config::is_valid_weekly_goal,
    )?;
    let break_start = ask(
        input,
        output,
        &format!("Set initial break credits (default: {}): ", DEFAULT_BREAK_START),
        DEFAULT_BREAK_START,
        |_| true,
    )?;

    Ok(Config::new(weekly_goal, break_start))
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: u32,
    valid: impl Fn(u32) -> bool,
) -> Result<u32> {
    write!(output, "{}", prompt).map_err(|e| GrainError::storage("<stdout>", e))?;
    output
        .flush()
        .map_err(|e| GrainError::storage("<stdout>", e))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| GrainError::storage("<stdin>", e))?;

    let answer = line.trim();
    if answer.is_empty() {
        return Ok(default);
    }
    match answer.parse::<u32>() {
        Ok(n) if valid(n) => Ok(n),
        _ => {
            writeln!(output, "Invalid input, using default.")
                .map_err(|e| GrainError::storage("<stdout>", e))?;
            Ok(default)
        }
    }
}
