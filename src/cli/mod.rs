// src/cli/mod.rs
//! CLI definitions for choco-reconcile
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! Primary commands act on declared packages directly:
//! - `install` / `upgrade` - Converge named packages, honoring version pins
//! - `remove` / `purge` - Uninstall named packages in one batch
//! - `uninstall` - Deprecated alias of `remove`
//! - `status` - Show declared, installed and available versions
//!
//! The `model` context works on the declaration file as a whole.

use clap::{Args, Parser, Subcommand};

mod model;

pub use model::ModelCommands;

#[derive(Parser)]
#[command(name = "choco-reconcile")]
#[command(author, version)]
#[command(about = "Desired-state package reconciliation for Chocolatey", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to the package declaration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Repository to scope available-package queries and installs to
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Extra options passed verbatim to install, upgrade and uninstall
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub options: Option<String>,

    /// Per-invocation timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Path to choco.exe (skips discovery)
    #[arg(long, global = true)]
    pub binary: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Package selection and dry-run flag for a single action
#[derive(Args, Debug, Clone, Default)]
pub struct ActionArgs {
    /// Packages to act on, as NAME or NAME@VERSION (default: all declared)
    pub packages: Vec<String>,

    /// Print the planned choco invocations without running them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    // =========================================================================
    // Primary Commands
    // =========================================================================
    /// Install packages, one invocation per pinned version
    Install(ActionArgs),

    /// Upgrade packages, one invocation per pinned version
    Upgrade(ActionArgs),

    /// Remove packages in a single invocation
    Remove(ActionArgs),

    /// Remove packages (identical to remove)
    Purge(ActionArgs),

    /// Deprecated: use `remove`
    Uninstall(ActionArgs),

    /// Show declared, installed and available versions
    Status,

    // =========================================================================
    // Management Contexts
    // =========================================================================
    /// Work with the declaration file as a whole
    #[command(subcommand)]
    Model(ModelCommands),
}
