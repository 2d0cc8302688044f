// src/lib.rs

//! choco-reconcile
//!
//! Desired-state package reconciliation for Chocolatey. Given a declared
//! set of packages (optionally version-pinned) and an action, it computes
//! and runs the smallest set of `choco` invocations that converge the
//! machine to the declaration.
//!
//! # Architecture
//!
//! - `packages`: request -> desired map, memoized installed/available views
//! - `model`: actions, batch planning, convergence diff, declaration files
//! - `command`: command-line values, execution with timeout, binary lookup
//! - `reconcile`: the per-run driver composing the above

pub mod command;
mod error;
pub mod model;
pub mod packages;
pub mod reconcile;

pub use command::{
    join_args, BinaryLocator, ChocolateyLocator, CommandLine, CommandOutput, CommandRunner,
    InvocationSettings, SystemRunner,
};
pub use error::{Error, Result};
pub use model::{
    compute_diff, Action, BatchPlanner, DiffAction, ModelDiff, PackageModel, PackageStatus,
};
pub use packages::{resolve_desired, DesiredMap, PackageQueryCache, PackageRequest, QueryView};
pub use reconcile::Reconciler;
