// src/commands/mod.rs
//! Command handlers for the choco-reconcile CLI

mod model;
mod package;

pub use model::{cmd_model_apply, cmd_model_check, cmd_model_diff, cmd_model_snapshot};
pub use package::{cmd_action, cmd_status};

use crate::cli::GlobalArgs;
use anyhow::{bail, Context, Result};
use choco_reconcile::model::{default_model_path, parse_model_file, PackageModel};
use choco_reconcile::{BinaryLocator, ChocolateyLocator, InvocationSettings, Reconciler, SystemRunner};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Name used in dry-run output when choco.exe cannot be found
const FALLBACK_BINARY: &str = "choco.exe";

/// Load the declaration file
///
/// An explicit `--config` must exist; the default location is optional and
/// falls back to an empty model.
pub(crate) fn load_model(global: &GlobalArgs) -> Result<PackageModel> {
    if let Some(path) = &global.config {
        return parse_model_file(Path::new(path))
            .with_context(|| format!("Failed to load declaration file {}", path));
    }

    match default_model_path() {
        Some(path) if path.exists() => {
            debug!("Using declaration file {}", path.display());
            parse_model_file(&path)
                .with_context(|| format!("Failed to load declaration file {}", path.display()))
        }
        _ => {
            debug!("No declaration file found, starting from an empty model");
            Ok(PackageModel::new())
        }
    }
}

/// Invocation settings from the model with command-line overrides applied
fn settings(global: &GlobalArgs, model: &PackageModel) -> Result<InvocationSettings> {
    let mut settings = model.settings();
    if let Some(source) = &global.source {
        settings.source = Some(source.clone());
    }
    if let Some(options) = &global.options {
        settings.options = Some(options.clone());
    }
    if let Some(secs) = global.timeout {
        if secs == 0 {
            bail!("--timeout must be greater than zero");
        }
        settings.timeout = Duration::from_secs(secs);
    }
    Ok(settings)
}

/// Locate choco.exe, tolerating a missing binary for dry runs
fn resolve_binary(global: &GlobalArgs, model: &PackageModel, dry_run: bool) -> Result<String> {
    let locator = match (&global.binary, &model.chocolatey.binary) {
        (Some(path), _) => ChocolateyLocator::with_override(path),
        (None, Some(path)) => ChocolateyLocator::with_override(path),
        (None, None) => ChocolateyLocator::new(),
    };

    match locator.locate() {
        Ok(path) => Ok(path.to_string_lossy().into_owned()),
        Err(e) if dry_run => {
            warn!("{}; showing plan with '{}'", e, FALLBACK_BINARY);
            Ok(FALLBACK_BINARY.to_string())
        }
        Err(e) => Err(e).context("Cannot run Chocolatey"),
    }
}

/// Build a reconciler for the model's declared packages
pub(crate) fn open_reconciler(
    global: &GlobalArgs,
    model: &PackageModel,
    dry_run: bool,
) -> Result<Reconciler<SystemRunner>> {
    let settings = settings(global, model)?;
    let binary = resolve_binary(global, model, dry_run)?;
    Ok(Reconciler::with_binary(
        model.to_request(),
        settings,
        SystemRunner::new(),
        binary,
    ))
}
