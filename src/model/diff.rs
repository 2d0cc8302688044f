// src/model/diff.rs

//! Diff computation between declared packages and installed state.

use super::action::Action;
use crate::packages::request::DesiredMap;

/// An action to take to reach the declared state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffAction {
    /// Install a package that is not present
    Install {
        package: String,
        /// Pinned version, if any
        pin: Option<String>,
    },

    /// Move an installed package to its pinned version
    Upgrade {
        package: String,
        current_version: String,
        target_version: String,
    },
}

impl DiffAction {
    /// Get the package name this action affects
    pub fn package(&self) -> &str {
        match self {
            DiffAction::Install { package, .. } => package,
            DiffAction::Upgrade { package, .. } => package,
        }
    }

    /// The driver action that carries this out
    pub fn action(&self) -> Action {
        match self {
            DiffAction::Install { .. } => Action::Install,
            DiffAction::Upgrade { .. } => Action::Upgrade,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> String {
        match self {
            DiffAction::Install { package, pin } => match pin {
                Some(v) => format!("Install {} (pinned to {})", package, v),
                None => format!("Install {}", package),
            },
            DiffAction::Upgrade {
                package,
                current_version,
                target_version,
            } => format!("Upgrade {} ({} -> {})", package, current_version, target_version),
        }
    }
}

/// The result of comparing declared packages with installed state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelDiff {
    /// Actions to take, in declaration order
    pub actions: Vec<DiffAction>,

    /// Declared packages that already match
    pub satisfied: Vec<String>,
}

impl ModelDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no changes are needed
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Packages that need installing
    pub fn packages_to_install(&self) -> Vec<&str> {
        self.packages_for(Action::Install)
    }

    /// Packages that need moving to their pin
    pub fn packages_to_upgrade(&self) -> Vec<&str> {
        self.packages_for(Action::Upgrade)
    }

    fn packages_for(&self, action: Action) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|a| a.action() == action)
            .map(|a| a.package())
            .collect()
    }
}

/// Compute the diff between declared packages and installed versions
///
/// `installed` is index-aligned with `desired`'s iteration order. Unpinned
/// packages are satisfied by any installed version.
pub fn compute_diff(desired: &DesiredMap, installed: &[Option<String>]) -> ModelDiff {
    debug_assert_eq!(desired.len(), installed.len());

    let mut diff = ModelDiff::new();

    for ((package, pin), current) in desired.iter().zip(installed) {
        match (current, pin) {
            (None, pin) => diff.actions.push(DiffAction::Install {
                package: package.to_string(),
                pin: pin.map(str::to_string),
            }),
            (Some(current), Some(pin)) if current != pin => {
                diff.actions.push(DiffAction::Upgrade {
                    package: package.to_string(),
                    current_version: current.clone(),
                    target_version: pin.to_string(),
                })
            }
            (Some(_), _) => diff.satisfied.push(package.to_string()),
        }
    }

    diff
}
