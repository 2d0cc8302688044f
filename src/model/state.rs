// src/model/state.rs

//! Per-package state rows for status reporting.

use crate::packages::request::DesiredMap;

/// Declared, installed and candidate versions of one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageStatus {
    /// Package name as declared
    pub name: String,

    /// Pinned version, if any
    pub desired: Option<String>,

    /// Installed version
    pub current: Option<String>,

    /// Version offered by the configured sources
    pub candidate: Option<String>,
}

impl PackageStatus {
    /// Check if the package is installed
    pub fn is_installed(&self) -> bool {
        self.current.is_some()
    }

    /// Check if the installed version satisfies the declaration
    pub fn is_satisfied(&self) -> bool {
        match (&self.current, &self.desired) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(current), Some(desired)) => current == desired,
        }
    }

    /// Check if the package can be installed at all
    pub fn is_resolvable(&self) -> bool {
        self.candidate.is_some()
    }
}

/// Build status rows from index-aligned state vectors
///
/// `current` and `candidate` follow `desired`'s iteration order.
pub fn zip_status(
    desired: &DesiredMap,
    current: Vec<Option<String>>,
    candidate: Vec<Option<String>>,
) -> Vec<PackageStatus> {
    desired
        .iter()
        .zip(current)
        .zip(candidate)
        .map(|(((name, pin), current), candidate)| PackageStatus {
            name: name.to_string(),
            desired: pin.map(str::to_string),
            current,
            candidate,
        })
        .collect()
}
