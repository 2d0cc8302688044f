// src/command/choco.rs

//! Chocolatey invocations: list queries and planned actions

use super::{CommandLine, CommandOutput, CommandRunner};
use crate::error::{Error, Result};
use crate::packages::query::{ListPackages, QueryView};
use std::time::Duration;
use tracing::{debug, info};

/// Chocolatey's own default execution timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2700);

/// Subcommand listing installed packages
pub const INSTALLED_VERB: &str = "list";

/// Subcommand listing packages available from the configured sources
pub const AVAILABLE_VERB: &str = "search";

/// Machine-readable `name|version` output
pub const LIMIT_OUTPUT_FLAG: &str = "--limit-output";

/// Arguments shared by every invocation in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSettings {
    /// Repository to scope available-package queries and installs to
    pub source: Option<String>,
    /// Free-form options appended to install/upgrade/uninstall
    pub options: Option<String>,
    /// Per-invocation timeout
    pub timeout: Duration,
}

impl Default for InvocationSettings {
    fn default() -> Self {
        Self {
            source: None,
            options: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A located `choco.exe` plus the runner that executes it
#[derive(Debug)]
pub struct Chocolatey<R> {
    binary: String,
    settings: InvocationSettings,
    runner: R,
}

impl<R: CommandRunner> Chocolatey<R> {
    pub fn new(binary: impl Into<String>, settings: InvocationSettings, runner: R) -> Self {
        Self {
            binary: binary.into(),
            settings,
            runner,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn settings(&self) -> &InvocationSettings {
        &self.settings
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Command line for a bulk list of `view`
    ///
    /// Targets Chocolatey 2.x, where `list` only reports installed packages
    /// and remote lookups go through `search`. Installed-state queries are
    /// never scoped to a source.
    pub fn list_command(&self, view: QueryView) -> CommandLine {
        match view {
            QueryView::Installed => {
                CommandLine::new(&self.binary, INSTALLED_VERB).flag(LIMIT_OUTPUT_FLAG)
            }
            QueryView::Available => CommandLine::new(&self.binary, AVAILABLE_VERB)
                .flag(LIMIT_OUTPUT_FLAG)
                .source(self.settings.source.as_deref()),
        }
    }

    /// Run one planned invocation, failing on non-zero exit
    pub fn execute(&self, line: &CommandLine) -> Result<CommandOutput> {
        let rendered = line.render();
        info!("Running: {}", rendered);

        let output = self.runner.run(&rendered, self.settings.timeout)?;
        if output.status != 0 {
            return Err(Error::execution(rendered, format!("exit code {}", output.status)));
        }
        Ok(output)
    }
}

impl<R: CommandRunner> ListPackages for Chocolatey<R> {
    fn list(&self, view: QueryView) -> Result<String> {
        let rendered = self.list_command(view).render();
        debug!("Querying {} packages: {}", view, rendered);

        let output = self.runner.run(&rendered, self.settings.timeout)?;
        if output.status != 0 {
            return Err(Error::execution(rendered, format!("exit code {}", output.status)));
        }
        Ok(output.stdout)
    }
}
