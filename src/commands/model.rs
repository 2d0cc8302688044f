// src/commands/model.rs

//! Package Model Commands
//!
//! Commands for declarative package state management using model files.

use super::{load_model, open_reconciler};
use crate::cli::GlobalArgs;
use anyhow::{Context, Result};
use choco_reconcile::ModelDiff;
use tracing::info;

fn print_diff(diff: &ModelDiff) {
    for action in &diff.actions {
        println!("  {}", action.description());
    }
}

/// Show what `model apply` would change
pub fn cmd_model_diff(global: &GlobalArgs) -> Result<()> {
    let model = load_model(global)?;
    let mut reconciler = open_reconciler(global, &model, false)?;
    let diff = reconciler.diff().context("Failed to compute diff")?;

    if diff.is_empty() {
        println!("System matches the model ({} packages)", diff.satisfied.len());
        return Ok(());
    }

    println!("Changes needed to reach the model:");
    print_diff(&diff);
    println!();
    println!(
        "{} to install, {} to upgrade, {} up to date",
        diff.packages_to_install().len(),
        diff.packages_to_upgrade().len(),
        diff.satisfied.len()
    );
    Ok(())
}

/// Converge installed packages to the model
pub fn cmd_model_apply(global: &GlobalArgs, dry_run: bool) -> Result<()> {
    let model = load_model(global)?;
    let mut reconciler = open_reconciler(global, &model, dry_run)?;

    if dry_run {
        let plan = reconciler.converge_plan().context("Failed to plan changes")?;
        if plan.is_empty() {
            println!("System matches the model; nothing to do");
        } else {
            println!("Would run {} invocation(s):", plan.len());
            for line in &plan {
                println!("  {}", line);
            }
        }
        return Ok(());
    }

    info!("Applying model with {} declared package(s)", model.packages.len());
    let diff = reconciler.converge().context("Failed to apply model")?;

    if diff.is_empty() {
        println!("System matches the model; nothing to do");
    } else {
        println!("Applied {} change(s):", diff.actions.len());
        print_diff(&diff);
    }
    Ok(())
}

/// Report drift; returns `true` when installed state matches the model
pub fn cmd_model_check(global: &GlobalArgs, details: bool) -> Result<bool> {
    let model = load_model(global)?;
    let mut reconciler = open_reconciler(global, &model, false)?;
    let diff = reconciler.diff().context("Failed to compute diff")?;

    if diff.is_empty() {
        println!("OK: system matches the model");
        return Ok(true);
    }

    println!("DRIFT: {} package(s) differ from the model", diff.actions.len());
    if details {
        print_diff(&diff);
    }
    Ok(false)
}

/// Write installed packages out as a declaration file
pub fn cmd_model_snapshot(global: &GlobalArgs, output: Option<&str>) -> Result<()> {
    let model = load_model(global)?;
    let mut reconciler = open_reconciler(global, &model, false)?;

    let snapshot = reconciler.snapshot().context("Failed to list installed packages")?;
    let toml = snapshot.to_toml().context("Failed to serialize snapshot")?;

    match output {
        Some(path) => {
            std::fs::write(path, &toml).with_context(|| format!("Failed to write {}", path))?;
            println!("Wrote {} package(s) to {}", snapshot.packages.len(), path);
        }
        None => print!("{}", toml),
    }
    Ok(())
}
