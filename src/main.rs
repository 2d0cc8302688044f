// src/main.rs

use anyhow::Result;
use choco_reconcile::Action;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands, ModelCommands};

/// Exit status of `model check` when installed state drifted
const DRIFT_EXIT_CODE: i32 = 2;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.global.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let global = &cli.global;

    match cli.command {
        Commands::Install(args) => commands::cmd_action(global, Action::Install, args),
        Commands::Upgrade(args) => commands::cmd_action(global, Action::Upgrade, args),
        Commands::Remove(args) => commands::cmd_action(global, Action::Remove, args),
        Commands::Purge(args) => commands::cmd_action(global, Action::Purge, args),
        Commands::Uninstall(args) => commands::cmd_action(global, Action::Uninstall, args),
        Commands::Status => commands::cmd_status(global),
        Commands::Model(model_cmd) => match model_cmd {
            ModelCommands::Diff => commands::cmd_model_diff(global),
            ModelCommands::Apply { dry_run } => commands::cmd_model_apply(global, dry_run),
            ModelCommands::Check { details } => {
                if !commands::cmd_model_check(global, details)? {
                    std::process::exit(DRIFT_EXIT_CODE);
                }
                Ok(())
            }
            ModelCommands::Snapshot { output } => {
                commands::cmd_model_snapshot(global, output.as_deref())
            }
        },
    }
}
