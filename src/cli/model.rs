// src/cli/model.rs
//! Package model commands

use clap::Subcommand;

#[derive(Subcommand)]
pub enum ModelCommands {
    /// Show what changes are needed to reach the declared state
    ///
    /// Compares the declaration file against installed packages and lists
    /// the packages that would be installed or moved to their pinned version.
    Diff,

    /// Apply the declaration to reach the desired state
    ///
    /// Installs missing packages, then upgrades pinned packages whose
    /// installed version differs from the pin.
    Apply {
        /// Print the planned choco invocations without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Check if installed packages match the declaration
    ///
    /// Exits 0 when nothing would change and 2 when there is drift.
    /// Useful for drift detection in scheduled tasks or CI.
    Check {
        /// Show details of differences
        #[arg(short = 'd', long)]
        details: bool,
    },

    /// Create a declaration file from installed packages
    ///
    /// Every installed package is pinned at its current version.
    Snapshot {
        /// Output file path (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}
