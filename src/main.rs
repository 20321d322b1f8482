//! Grain - weekly study and break credit tracker
//!
//! CLI entry point with global panic handler.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use grain::cli::backup::BackupOptions;
use grain::cli::config_cmd::ConfigOptions;
use grain::cli::goal::GoalOptions;
use grain::cli::history::HistoryOptions;
use grain::cli::init::load_or_setup;
use grain::cli::prompt::{confirm, RESET_PHRASE, RESTORE_ANSWERS};
use grain::cli::record::RecordOptions;
use grain::cli::reset::ResetOptions;
use grain::cli::stats::StatsOptions;
use grain::cli::undo::UndoOptions;
use grain::cli::week::WeekOptions;
use grain::cli::{
    BackupCommand, ConfigCommand, GoalCommand, HistoryCommand, RecordCommand, ResetCommand,
    StatsCommand, UndoCommand, WeekCommand,
};
use grain::config::{config_path, crash_log_path, ensure_home, grain_home, Config};
use grain::core::LogKind;
use grain::error::{exit_codes, GrainError, Result};
use grain::storage::{FileStateStore, StateStore};

// =============================================================================
// CLI Definition
// =============================================================================

/// Grain - minimalist tracker for focused work and breaks.
///
/// Log study time to earn credits against a weekly goal, and spend break
/// credits from a weekly allowance. Running `grain [amount]` without a
/// subcommand logs study credits.
#[derive(Parser)]
#[command(name = "grain")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Study credits to log when no subcommand is given (default: 1)
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    amount: Option<u32>,

    /// Output as JSON
    #[arg(long, short, global = true)]
    json: bool,

    /// Suppress output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log study credits (default: 1)
    #[command(name = "s", visible_alias = "study")]
    Study {
        /// Credits to log
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        amount: Option<u32>,
    },

    /// Log break credits (default: 1)
    #[command(name = "b", visible_alias = "break")]
    Break {
        /// Credits to spend
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        amount: Option<u32>,
    },

    /// View log entries (default: today)
    Log {
        /// Start of the range: today, yesterday, monday or YYYY-MM-DD
        #[arg(long)]
        since: Option<String>,
    },

    /// View the current week
    Week,

    /// Show streak, best surplus and lifetime totals
    Stats,

    /// View or set the weekly study goal
    Goal {
        /// New weekly goal
        amount: Option<u32>,
    },

    /// Undo the last logged entry
    Undo,

    /// Reset the current week's data
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Save a timestamped backup of all data
    Backup,

    /// List saved backups, newest first
    Backups,

    /// Replace current data with a backup from the backups directory
    Restore {
        /// Backup file name, e.g. backup_2024-06-03_09-00-00.json
        name: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Open config.toml in $EDITOR
    Config,
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_fatal() {
                eprintln!(
                    "Stored data may be inconsistent. Consider `grain restore <backup>` \
                    from a recent backup."
                );
            }
            ExitCode::from(exit_codes::FAILURE as u8)
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.grain/crash.log and exits with the crash code.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("grain panic: {}", info);

        if let Some(home) = grain_home() {
            let crash_log = crash_log_path(&home);
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Install the stderr subscriber, filtered by `GRAIN_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("GRAIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Resolve the home directory, load config and state, and dispatch.
fn run(cli: Cli) -> Result<()> {
    if cli.amount.is_some() && cli.command.is_some() {
        return Err(GrainError::validation(
            "a bare amount cannot be combined with a subcommand",
        ));
    }

    let home = grain_home()
        .ok_or_else(|| GrainError::config("could not determine grain home directory"))?;
    ensure_home(&home)?;

    let config_file = config_path(&home);
    let config = {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        load_or_setup(&config_file, interactive, &mut stdin.lock(), &mut io::stdout())?
    };

    let store = FileStateStore::with_home(&home);
    if !store.exists()? {
        tracing::info!(path = %store.data_path().display(), "first run, creating data file");
        store.save(&store.load()?)?;
    }

    let (json, quiet) = (cli.json, cli.quiet);
    match cli.command {
        None => run_record(store, config, LogKind::Study, cli.amount, json, quiet),
        Some(Commands::Study { amount }) => {
            run_record(store, config, LogKind::Study, amount, json, quiet)
        }
        Some(Commands::Break { amount }) => {
            run_record(store, config, LogKind::Break, amount, json, quiet)
        }
        Some(Commands::Log { since }) => run_log(store, config, since, json, quiet),
        Some(Commands::Week) => run_week(store, config, json, quiet),
        Some(Commands::Stats) => run_stats(store, config, json, quiet),
        Some(Commands::Goal { amount }) => run_goal(&config_file, config, amount, json, quiet),
        Some(Commands::Undo) => run_undo(store, config, json, quiet),
        Some(Commands::Reset { yes }) => run_reset(store, config, yes, json, quiet),
        Some(Commands::Backup) => run_backup(store, config, json, quiet),
        Some(Commands::Backups) => run_backups(store, config, json, quiet),
        Some(Commands::Restore { name, yes }) => {
            run_restore(store, config, &name, yes, json, quiet)
        }
        Some(Commands::Config) => run_config(config_file, config, json, quiet),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn emit(formatted: String) {
    if !formatted.is_empty() {
        println!("{}", formatted);
    }
}

/// Ask on stderr so stdout stays clean for `--json`.
fn ask(prompt: &str, accepted: &[&str]) -> Result<bool> {
    confirm(&mut io::stdin().lock(), &mut io::stderr(), prompt, accepted)
}

fn run_record<S: StateStore>(
    store: S,
    config: Config,
    kind: LogKind,
    amount: Option<u32>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let cmd = RecordCommand::new(store, config);
    let options = RecordOptions { json, quiet };

    let output = cmd.run(kind, amount.unwrap_or(1))?;
    emit(cmd.format_output(&output, &options));
    Ok(())
}

fn run_log<S: StateStore>(
    store: S,
    config: Config,
    since: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let cmd = HistoryCommand::new(store, config);
    let options = HistoryOptions { json, quiet };

    let output = cmd.run(since.as_deref())?;
    emit(cmd.format_output(&output, &options));
    Ok(())
}

fn run_week<S: StateStore>(store: S, config: Config, json: bool, quiet: bool) -> Result<()> {
    let cmd = WeekCommand::new(store, config);
    let options = WeekOptions { json, quiet };

    let output = cmd.run()?;
    emit(cmd.format_output(&output, &options));
    Ok(())
}

fn run_stats<S: StateStore>(store: S, config: Config, json: bool, quiet: bool) -> Result<()> {
    let cmd = StatsCommand::new(store, config);
    let options = StatsOptions { json, quiet };

    let output = cmd.run()?;
    emit(cmd.format_output(&output, &options));
    Ok(())
}

fn run_goal(
    config_file: &Path,
    config: Config,
    amount: Option<u32>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let cmd = GoalCommand::new(config_file, config);
    let options = GoalOptions { json, quiet };

    let output = cmd.run(amount)?;
    emit(cmd.format_output(&output, &options));
    Ok(())
}

fn run_undo<S: StateStore>(store: S, config: Config, json: bool, quiet: bool) -> Result<()> {
    let cmd = UndoCommand::new(store, config);
    let options = UndoOptions { json, quiet };

    let output = cmd.run()?;
    emit(cmd.format_output(&output, &options));
    Ok(())
}

fn run_reset<S: StateStore>(
    store: S,
    config: Config,
    yes: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let confirmed = yes
        || ask(
            "⚠️  Are you sure you want to reset this week's data?\nType \"reset grain\" to confirm:",
            &[RESET_PHRASE],
        )?;

    let cmd = ResetCommand::new(store, config);
    let options = ResetOptions { json, quiet };

    let output = cmd.run(confirmed)?;
    emit(cmd.format_output(&output, &options));
    Ok(())
}

fn run_backup(store: FileStateStore, config: Config, json: bool, quiet: bool) -> Result<()> {
    let cmd = BackupCommand::new(store, config);
    let options = BackupOptions { json, quiet };

    let output = cmd.backup()?;
    emit(cmd.format_output(&output, &options));
    Ok(())
}

fn run_backups(store: FileStateStore, config: Config, json: bool, quiet: bool) -> Result<()> {
    let cmd = BackupCommand::new(store, config);
    let options = BackupOptions { json, quiet };

    let output = cmd.list()?;
    emit(cmd.format_output(&output, &options));
    Ok(())
}

fn run_restore(
    store: FileStateStore,
    config: Config,
    name: &str,
    yes: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let confirmed = yes
        || ask(
            &format!(
                "⚠️ This will overwrite current data with the contents of '{}'.\nType \"yes\" to confirm:",
                name
            ),
            RESTORE_ANSWERS,
        )?;

    let cmd = BackupCommand::new(store, config);
    let options = BackupOptions { json, quiet };

    let output = cmd.restore(name, confirmed)?;
    emit(cmd.format_output(&output, &options));
    Ok(())
}

fn run_config(config_file: PathBuf, config: Config, json: bool, quiet: bool) -> Result<()> {
    let cmd = ConfigCommand::new(config_file, config);
    let options = ConfigOptions { json, quiet };

    if !quiet && !json {
        println!("Opening {} ...", cmd.config_path().display());
    }
    let output = cmd.run()?;
    emit(cmd.format_output(&output, &options));
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
