// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use choco_reconcile::{
    CommandOutput, CommandRunner, Error, InvocationSettings, PackageRequest, Reconciler, Result,
};
use std::cell::RefCell;
use std::time::Duration;

/// Binary name used by every test reconciler
pub const CHOCO: &str = "choco";

/// Stands in for choco.exe: answers list queries from canned output and
/// records every command line it is asked to run.
#[derive(Default)]
pub struct ScriptedRunner {
    installed: String,
    available: String,
    fail_on: Option<String>,
    commands: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new(installed: &str, available: &str) -> Self {
        Self {
            installed: installed.to_string(),
            available: available.to_string(),
            ..Default::default()
        }
    }

    /// Exit non-zero for any command containing `pattern`
    pub fn failing_on(mut self, pattern: &str) -> Self {
        self.fail_on = Some(pattern.to_string());
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    /// Commands other than list and search queries
    pub fn mutations(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter(|c| !is_installed_query(c) && !is_available_query(c))
            .collect()
    }

    pub fn count_matching(&self, pattern: &str) -> usize {
        self.commands
            .borrow()
            .iter()
            .filter(|c| c.contains(pattern))
            .count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &str, _timeout: Duration) -> Result<CommandOutput> {
        self.commands.borrow_mut().push(command.to_string());

        if self.fail_on.as_deref().is_some_and(|p| command.contains(p)) {
            return Ok(CommandOutput {
                stdout: String::new(),
                status: 1,
            });
        }

        if is_installed_query(command) {
            Ok(CommandOutput::success(self.installed.clone()))
        } else if is_available_query(command) {
            Ok(CommandOutput::success(self.available.clone()))
        } else {
            Ok(CommandOutput::success(""))
        }
    }
}

pub fn is_installed_query(command: &str) -> bool {
    command.starts_with(&format!("{} list ", CHOCO))
}

pub fn is_available_query(command: &str) -> bool {
    command.starts_with(&format!("{} search ", CHOCO))
}

/// Build a request from (name, pin) pairs
pub fn request(entries: &[(&str, Option<&str>)]) -> PackageRequest {
    PackageRequest::with_versions(
        entries.iter().map(|(name, _)| name.to_string()).collect(),
        entries.iter().map(|(_, pin)| pin.map(str::to_string)).collect(),
    )
}

/// Reconciler over `runner` with default settings
pub fn reconciler(request: PackageRequest, runner: &ScriptedRunner) -> Reconciler<&ScriptedRunner> {
    reconciler_with(request, InvocationSettings::default(), runner)
}

pub fn reconciler_with(
    request: PackageRequest,
    settings: InvocationSettings,
    runner: &ScriptedRunner,
) -> Reconciler<&ScriptedRunner> {
    Reconciler::with_binary(request, settings, runner, CHOCO)
}

/// True when `err` is an execution failure
pub fn is_execution_error(err: &Error) -> bool {
    matches!(err, Error::ExecutionError { .. })
}
