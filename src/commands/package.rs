// src/commands/package.rs
//! Package action commands: install, upgrade, remove, purge, status

use super::{load_model, open_reconciler};
use crate::cli::{ActionArgs, GlobalArgs};
use anyhow::{Context, Result};
use choco_reconcile::model::parse_package_spec;
use choco_reconcile::Action;
use tracing::info;

/// Run one action over the selected (or all declared) packages
pub fn cmd_action(global: &GlobalArgs, action: Action, args: ActionArgs) -> Result<()> {
    let mut model = load_model(global)?;

    let specs = args
        .packages
        .iter()
        .map(|s| parse_package_spec(s))
        .collect::<Result<Vec<_>, _>>()?;

    let names = if specs.is_empty() {
        model.names()
    } else {
        model.merge_specs(specs)
    };
    model.validate().context("Invalid package selection")?;

    if names.is_empty() {
        println!("No packages declared; nothing to {}", action);
        return Ok(());
    }

    let mut reconciler = open_reconciler(global, &model, args.dry_run)?;

    if args.dry_run {
        let plan = reconciler.plan(action, &names)?;
        println!("Would run {} invocation(s):", plan.len());
        for line in &plan {
            println!("  {}", line);
        }
        return Ok(());
    }

    info!("Running {} for {} package(s)", action, names.len());
    let count = reconciler
        .run(action, &names)
        .with_context(|| format!("Failed to {} {}", action, names.join(", ")))?;

    println!(
        "Completed {} for {} package(s) in {} invocation(s)",
        action,
        names.len(),
        count
    );
    Ok(())
}

/// Print declared, installed and available versions
pub fn cmd_status(global: &GlobalArgs) -> Result<()> {
    let model = load_model(global)?;
    if model.packages.is_empty() {
        println!("No packages declared");
        return Ok(());
    }

    let mut reconciler = open_reconciler(global, &model, false)?;
    let rows = reconciler.status().context("Failed to query package state")?;

    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0).max(7);
    println!(
        "{:<width$}  {:<14}  {:<14}  {:<14}",
        "PACKAGE", "DESIRED", "INSTALLED", "AVAILABLE",
        width = width
    );
    for row in &rows {
        let marker = if row.is_satisfied() { ' ' } else { '*' };
        println!(
            "{:<width$}  {:<14}  {:<14}  {:<14}{}",
            row.name,
            row.desired.as_deref().unwrap_or("(any)"),
            row.current.as_deref().unwrap_or("-"),
            row.candidate.as_deref().unwrap_or("-"),
            marker,
            width = width
        );
    }

    let unresolvable: Vec<&str> = rows
        .iter()
        .filter(|r| !r.is_installed() && !r.is_resolvable())
        .map(|r| r.name.as_str())
        .collect();
    if !unresolvable.is_empty() {
        println!();
        println!("Not installable from configured sources: {}", unresolvable.join(", "));
    }

    Ok(())
}
