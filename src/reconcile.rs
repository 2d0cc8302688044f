// src/reconcile.rs

//! Reconciliation driver
//!
//! [`Reconciler`] owns everything scoped to one reconciliation run: the
//! declared request, the located `choco.exe`, and the memoized package
//! views. Create one per run and drop it afterwards; it is not meant to be
//! shared across threads or reused between runs.
//!
//! Invocations run strictly in plan order. The first failure aborts the
//! rest of the call; invocations that already ran are not undone, which is
//! safe because re-running converges further.

use crate::command::{BinaryLocator, Chocolatey, CommandLine, CommandRunner, InvocationSettings};
use crate::error::{Error, Result};
use crate::model::{
    compute_diff, zip_status, Action, BatchPlanner, ModelDiff, PackageModel, PackageSpec,
    PackageStatus,
};
use crate::packages::query::PackageQueryCache;
use crate::packages::request::{resolve_desired, DesiredMap, PackageRequest};
use tracing::{debug, info, warn};

/// Drives one reconciliation run against Chocolatey
#[derive(Debug)]
pub struct Reconciler<R> {
    choco: Chocolatey<R>,
    cache: PackageQueryCache,
    request: PackageRequest,
}

impl<R: CommandRunner> Reconciler<R> {
    /// Locate `choco.exe` once and prepare an empty run
    pub fn new(
        request: PackageRequest,
        settings: InvocationSettings,
        runner: R,
        locator: &dyn BinaryLocator,
    ) -> Result<Self> {
        let binary = locator.locate()?;
        info!("Using Chocolatey at {}", binary.display());
        Ok(Self::with_binary(
            request,
            settings,
            runner,
            binary.to_string_lossy().into_owned(),
        ))
    }

    /// Prepare a run with an already-resolved binary path
    pub fn with_binary(
        request: PackageRequest,
        settings: InvocationSettings,
        runner: R,
        binary: impl Into<String>,
    ) -> Self {
        Self {
            choco: Chocolatey::new(binary, settings, runner),
            cache: PackageQueryCache::new(),
            request,
        }
    }

    pub fn request(&self) -> &PackageRequest {
        &self.request
    }

    pub fn chocolatey(&self) -> &Chocolatey<R> {
        &self.choco
    }

    /// Desired name -> version mapping for the full request
    pub fn desired(&self) -> Result<DesiredMap> {
        resolve_desired(&self.request)
    }

    /// Installed versions, index-aligned with `names`
    pub fn load_current_state<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<Option<String>>> {
        let mut state = Vec::with_capacity(names.len());
        for name in names {
            state.push(self.cache.get_installed(&self.choco, name.as_ref())?);
        }
        Ok(state)
    }

    /// Candidate versions, index-aligned with `names`
    ///
    /// Unknown names resolve to `None` here; only install and upgrade treat
    /// that as an error.
    pub fn resolve_candidate_state<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<Vec<Option<String>>> {
        let mut state = Vec::with_capacity(names.len());
        for name in names {
            state.push(self.cache.get_available(&self.choco, name.as_ref())?);
        }
        Ok(state)
    }

    /// Command lines `action` would run over `names`, without running them
    pub fn plan<S: AsRef<str>>(&self, action: Action, names: &[S]) -> Result<Vec<CommandLine>> {
        self.plan_normalized(action.normalize(), names, false)
    }

    pub fn install<S: AsRef<str>>(&mut self, names: &[S]) -> Result<usize> {
        self.run(Action::Install, names)
    }

    pub fn upgrade<S: AsRef<str>>(&mut self, names: &[S]) -> Result<usize> {
        self.run(Action::Upgrade, names)
    }

    pub fn remove<S: AsRef<str>>(&mut self, names: &[S]) -> Result<usize> {
        self.run(Action::Remove, names)
    }

    pub fn purge<S: AsRef<str>>(&mut self, names: &[S]) -> Result<usize> {
        self.run(Action::Purge, names)
    }

    /// Deprecated: use [`Reconciler::remove`]
    pub fn uninstall<S: AsRef<str>>(&mut self, names: &[S]) -> Result<usize> {
        self.run(Action::Uninstall, names)
    }

    /// Plan and execute `action` over `names`
    ///
    /// Returns the number of invocations executed.
    pub fn run<S: AsRef<str>>(&mut self, action: Action, names: &[S]) -> Result<usize> {
        self.run_normalized(action.normalize(), names, false)
    }

    /// Declared, installed and candidate versions for every declared package
    pub fn status(&mut self) -> Result<Vec<PackageStatus>> {
        let desired = self.desired()?;
        let names = declared_names(&desired);
        let current = self.load_current_state(&names)?;
        let candidate = self.resolve_candidate_state(&names)?;
        Ok(zip_status(&desired, current, candidate))
    }

    /// What has to change for installed state to match the request
    pub fn diff(&mut self) -> Result<ModelDiff> {
        let desired = self.desired()?;
        let names = declared_names(&desired);
        let current = self.load_current_state(&names)?;
        Ok(compute_diff(&desired, &current))
    }

    /// Command lines [`Reconciler::converge`] would run
    pub fn converge_plan(&mut self) -> Result<Vec<CommandLine>> {
        let diff = self.diff()?;
        let mut plan = self.plan_normalized(Action::Install, &diff.packages_to_install(), false)?;
        plan.extend(self.plan_normalized(Action::Upgrade, &diff.packages_to_upgrade(), true)?);
        Ok(plan)
    }

    /// Install missing packages, then move mismatched pins
    ///
    /// A pin below the installed version is a downgrade, so pinned moves
    /// always carry the downgrade flag.
    pub fn converge(&mut self) -> Result<ModelDiff> {
        let diff = self.diff()?;
        if diff.is_empty() {
            info!("All {} declared packages are up to date", diff.satisfied.len());
            return Ok(diff);
        }

        for action in &diff.actions {
            debug!("{}", action.description());
        }

        self.run_normalized(Action::Install, &diff.packages_to_install(), false)?;
        self.run_normalized(Action::Upgrade, &diff.packages_to_upgrade(), true)?;
        Ok(diff)
    }

    /// Capture every installed package, pinned at its current version
    pub fn snapshot(&mut self) -> Result<PackageModel> {
        let installed = self.cache.installed_packages(&self.choco)?;

        let mut model = PackageModel::new();
        let settings = self.choco.settings();
        model.chocolatey.source = settings.source.clone();
        model.chocolatey.options = settings.options.clone();
        model.chocolatey.timeout_secs = settings.timeout.as_secs();
        model.packages = installed
            .into_iter()
            .map(|(name, version)| PackageSpec::new(name, Some(version)))
            .collect();
        Ok(model)
    }

    fn plan_normalized<S: AsRef<str>>(
        &self,
        action: Action,
        names: &[S],
        allow_downgrade: bool,
    ) -> Result<Vec<CommandLine>> {
        let desired = self.desired()?;
        let settings = self.choco.settings();
        let planner = BatchPlanner::new(
            self.choco.binary(),
            settings.source.as_deref(),
            settings.options.as_deref(),
        )
        .allow_downgrade(allow_downgrade);
        Ok(planner.plan(action, names, &desired))
    }

    fn run_normalized<S: AsRef<str>>(
        &mut self,
        action: Action,
        names: &[S],
        allow_downgrade: bool,
    ) -> Result<usize> {
        let plan = self.plan_normalized(action, names, allow_downgrade)?;

        if action.honors_pins() {
            self.ensure_candidates(&plan)?;
        }

        self.execute_plan(&plan)
    }

    /// Fail before running anything if a target has no available version
    fn ensure_candidates(&mut self, plan: &[CommandLine]) -> Result<()> {
        let mut missing = Vec::new();
        for name in plan.iter().flat_map(|line| &line.targets) {
            if self.cache.get_available(&self.choco, name)?.is_none() {
                missing.push(name.clone());
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::UnresolvableCandidate(missing))
        }
    }

    fn execute_plan(&self, plan: &[CommandLine]) -> Result<usize> {
        for (idx, line) in plan.iter().enumerate() {
            if let Err(e) = self.choco.execute(line) {
                let remaining = plan.len() - idx - 1;
                if remaining > 0 {
                    warn!("Skipping {} remaining invocation(s) after failure", remaining);
                }
                return Err(e);
            }
        }
        Ok(plan.len())
    }
}

fn declared_names(desired: &DesiredMap) -> Vec<String> {
    desired.iter().map(|(name, _)| name.to_string()).collect()
}
