// src/model/plan.rs

//! Partition a requested action into Chocolatey invocations
//!
//! `choco install a b -version 1.0` applies the one version to every target,
//! so packages that each need their own pin cannot share an invocation.
//! Pinned packages get one invocation each; everything unpinned is batched
//! into a single trailing invocation. Removal ignores pins and is always a
//! single batch.

use super::action::Action;
use crate::command::CommandLine;
use crate::packages::request::DesiredMap;
use tracing::debug;

/// Flag that suppresses Chocolatey's confirmation prompts
pub const CONFIRM_FLAG: &str = "-y";

/// Flag letting a pinned upgrade move to an older version
pub const ALLOW_DOWNGRADE_FLAG: &str = "--allow-downgrade";

/// Builds ordered invocation plans for one binary and set of global arguments
#[derive(Debug, Clone, Copy)]
pub struct BatchPlanner<'a> {
    binary: &'a str,
    source: Option<&'a str>,
    options: Option<&'a str>,
    allow_downgrade: bool,
}

impl<'a> BatchPlanner<'a> {
    pub fn new(binary: &'a str, source: Option<&'a str>, options: Option<&'a str>) -> Self {
        Self {
            binary,
            source,
            options,
            allow_downgrade: false,
        }
    }

    /// Let pinned upgrades go below the installed version
    ///
    /// Chocolatey refuses to move to an older `-version` otherwise.
    pub fn allow_downgrade(mut self, allow: bool) -> Self {
        self.allow_downgrade = allow;
        self
    }

    /// Plan `action` over the `names` subset of `desired`
    ///
    /// Pinned invocations come first, in map order, followed by at most one
    /// batched invocation. An empty subset plans nothing.
    pub fn plan<S: AsRef<str>>(
        &self,
        action: Action,
        names: &[S],
        desired: &DesiredMap,
    ) -> Vec<CommandLine> {
        let selected = desired.restrict(names);
        if selected.is_empty() {
            return Vec::new();
        }

        if !action.honors_pins() {
            let line = self
                .base(action)
                .targets(selected.iter().map(|(name, _)| name));
            return vec![line];
        }

        let (pinned, unpinned): (Vec<_>, Vec<_>) =
            selected.iter().partition(|(_, version)| version.is_some());

        debug!(
            "Planning {}: {} pinned, {} unpinned",
            action,
            pinned.len(),
            unpinned.len()
        );

        let mut plan: Vec<CommandLine> = pinned
            .into_iter()
            .map(|(name, version)| {
                let line = self.base(action);
                let line = if self.allow_downgrade && action == Action::Upgrade {
                    line.flag(ALLOW_DOWNGRADE_FLAG)
                } else {
                    line
                };
                line.version(version)
                    .source(self.source)
                    .target(name)
            })
            .collect();

        if !unpinned.is_empty() {
            plan.push(
                self.base(action)
                    .source(self.source)
                    .targets(unpinned.into_iter().map(|(name, _)| name)),
            );
        }

        plan
    }

    fn base(&self, action: Action) -> CommandLine {
        CommandLine::new(self.binary, action.verb())
            .flag(CONFIRM_FLAG)
            .options(self.options)
    }
}
