// src/packages/query.rs

//! Query installed and available Chocolatey packages
//!
//! Chocolatey's `--limit-output` mode prints one `name|version` record per
//! line. Each view (installed, available) is listed in bulk at most once per
//! [`PackageQueryCache`]; later lookups are answered from memory.
//!
//! The cache is populated with a check-then-fill pattern and is meant to
//! live for a single reconciliation run on a single thread.

use crate::error::{Error, Result};
use std::collections::HashMap;
use strum_macros::Display;
use tracing::debug;

/// Field separator in limit-output records
pub const RECORD_DELIMITER: char = '|';

/// Which package view to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum QueryView {
    /// Packages currently installed on this machine
    Installed,
    /// Packages offered by the configured sources
    Available,
}

/// Something that can produce raw list output for a view
pub trait ListPackages {
    /// Run the bulk list query for `view` and return its stdout
    fn list(&self, view: QueryView) -> Result<String>;
}

/// Parse limit-output text into a lowercased name -> version map
///
/// Blank lines are ignored. A record without exactly one delimiter, or with
/// an empty name, fails the whole parse.
pub fn parse_list_output(output: &str) -> Result<HashMap<String, String>> {
    let mut packages = HashMap::new();

    for (idx, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let (name, version) = line.split_once(RECORD_DELIMITER).ok_or_else(|| Error::ParseError {
            line: idx + 1,
            reason: format!("missing '{}' delimiter in {:?}", RECORD_DELIMITER, line),
        })?;

        if version.contains(RECORD_DELIMITER) {
            return Err(Error::ParseError {
                line: idx + 1,
                reason: format!("expected two fields in {:?}", line),
            });
        }
        if name.is_empty() {
            return Err(Error::ParseError {
                line: idx + 1,
                reason: "empty package name".to_string(),
            });
        }

        packages.insert(name.to_lowercase(), version.trim_end().to_string());
    }

    Ok(packages)
}

/// Memoized installed/available package versions for one run
#[derive(Debug, Default)]
pub struct PackageQueryCache {
    installed: Option<HashMap<String, String>>,
    available: Option<HashMap<String, String>>,
}

impl PackageQueryCache {
    /// Create an empty cache; nothing is queried until first lookup
    pub fn new() -> Self {
        Self::default()
    }

    /// Installed version of `name`, case-insensitively
    pub fn get_installed<L: ListPackages + ?Sized>(
        &mut self,
        lister: &L,
        name: &str,
    ) -> Result<Option<String>> {
        self.lookup(lister, QueryView::Installed, name)
    }

    /// Candidate version of `name` from the available view, case-insensitively
    pub fn get_available<L: ListPackages + ?Sized>(
        &mut self,
        lister: &L,
        name: &str,
    ) -> Result<Option<String>> {
        self.lookup(lister, QueryView::Available, name)
    }

    /// Every installed package as (lowercased name, version), sorted by name
    pub fn installed_packages<L: ListPackages + ?Sized>(
        &mut self,
        lister: &L,
    ) -> Result<Vec<(String, String)>> {
        let mut packages: Vec<(String, String)> = self
            .load(lister, QueryView::Installed)?
            .iter()
            .map(|(n, v)| (n.clone(), v.clone()))
            .collect();
        packages.sort();
        Ok(packages)
    }

    /// Check whether a view has already been listed
    pub fn is_loaded(&self, view: QueryView) -> bool {
        match view {
            QueryView::Installed => self.installed.is_some(),
            QueryView::Available => self.available.is_some(),
        }
    }

    fn lookup<L: ListPackages + ?Sized>(
        &mut self,
        lister: &L,
        view: QueryView,
        name: &str,
    ) -> Result<Option<String>> {
        let packages = self.load(lister, view)?;
        Ok(packages.get(&name.to_lowercase()).cloned())
    }

    fn load<L: ListPackages + ?Sized>(
        &mut self,
        lister: &L,
        view: QueryView,
    ) -> Result<&HashMap<String, String>> {
        let slot = match view {
            QueryView::Installed => &mut self.installed,
            QueryView::Available => &mut self.available,
        };

        if slot.is_none() {
            debug!("Listing {} packages", view);
            let output = lister.list(view)?;
            let packages = parse_list_output(&output)?;
            debug!("Found {} {} packages", packages.len(), view);
            *slot = Some(packages);
        }

        Ok(slot.get_or_insert_with(HashMap::new))
    }
}
