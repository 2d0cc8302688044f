// src/model/action.rs

//! Requested actions and their Chocolatey verbs

use strum_macros::{Display, EnumString};
use tracing::warn;

/// An action requested against a set of packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Action {
    Install,
    Upgrade,
    Remove,
    /// Same as `Remove`; Chocolatey has no separate purge
    Purge,
    /// Deprecated spelling of `Remove`
    Uninstall,
}

impl Action {
    /// Map deprecated aliases to their canonical action
    ///
    /// Emits a deprecation warning when an alias is rewritten.
    pub fn normalize(self) -> Action {
        match self {
            Action::Uninstall => {
                warn!(
                    deprecated = "uninstall",
                    replacement = "remove",
                    "the 'uninstall' action is deprecated, use 'remove' instead"
                );
                Action::Remove
            }
            other => other,
        }
    }

    /// Whether per-package version pins apply
    pub fn honors_pins(self) -> bool {
        matches!(self, Action::Install | Action::Upgrade)
    }

    /// The `choco` subcommand that carries out this action
    pub fn verb(self) -> &'static str {
        match self {
            Action::Install => "install",
            Action::Upgrade => "upgrade",
            Action::Remove | Action::Purge | Action::Uninstall => "uninstall",
        }
    }
}
