// src/model/parser.rs

//! Parser for package declaration TOML files.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::command::{InvocationSettings, DEFAULT_TIMEOUT};
use crate::error::{Error, Result};
use crate::packages::request::PackageRequest;

/// File name looked up in the user's config directory
pub const DEFAULT_MODEL_FILE: &str = "packages.toml";

/// Default location of the declaration file, if a config directory exists
pub fn default_model_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("choco-reconcile").join(DEFAULT_MODEL_FILE))
}

/// A declared set of packages plus Chocolatey settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageModel {
    /// How to invoke Chocolatey
    #[serde(default)]
    pub chocolatey: ChocolateyConfig,

    /// Declared packages, in order
    #[serde(default, rename = "package")]
    pub packages: Vec<PackageSpec>,
}

/// `[chocolatey]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChocolateyConfig {
    /// Explicit path to choco.exe, skipping discovery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<PathBuf>,

    /// Repository to scope queries and installs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Free-form options passed to install/upgrade/uninstall
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,

    /// Per-invocation timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for ChocolateyConfig {
    fn default() -> Self {
        Self {
            binary: None,
            source: None,
            options: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// One `[[package]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    pub name: String,

    /// Exact version to pin, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl PackageModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared package names in order
    pub fn names(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.name.clone()).collect()
    }

    /// Validate the model for consistency
    pub fn validate(&self) -> Result<()> {
        if self.chocolatey.timeout_secs == 0 {
            return Err(Error::ConfigError("timeout_secs must be greater than zero".to_string()));
        }

        let mut seen = HashSet::new();
        for pkg in &self.packages {
            if pkg.name.trim().is_empty() {
                return Err(Error::InvalidRequest("empty package name".to_string()));
            }
            if pkg.version.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(Error::InvalidRequest(format!(
                    "empty version pin for package '{}'",
                    pkg.name
                )));
            }
            // Chocolatey ids are case-insensitive, so Git and git collide
            if !seen.insert(pkg.name.to_lowercase()) {
                return Err(Error::InvalidRequest(format!(
                    "package '{}' is declared more than once",
                    pkg.name
                )));
            }
        }

        Ok(())
    }

    /// Convert the declared packages into a request
    ///
    /// The version list is absent when no package carries a pin.
    pub fn to_request(&self) -> PackageRequest {
        let names = self.names();
        if self.packages.iter().all(|p| p.version.is_none()) {
            return PackageRequest::new(names);
        }
        let versions = self.packages.iter().map(|p| p.version.clone()).collect();
        PackageRequest::with_versions(names, versions)
    }

    /// Merge command-line specs into the model
    ///
    /// A spec naming an already-declared package (case-insensitively)
    /// overrides its pin when it carries a version. Returns the declared
    /// names the specs refer to, in spec order.
    pub fn merge_specs(&mut self, specs: Vec<PackageSpec>) -> Vec<String> {
        let mut names = Vec::with_capacity(specs.len());
        for spec in specs {
            match self
                .packages
                .iter_mut()
                .find(|p| p.name.eq_ignore_ascii_case(&spec.name))
            {
                Some(existing) => {
                    if spec.version.is_some() {
                        existing.version = spec.version;
                    }
                    names.push(existing.name.clone());
                }
                None => {
                    names.push(spec.name.clone());
                    self.packages.push(spec);
                }
            }
        }
        names
    }

    /// Invocation settings from the `[chocolatey]` section
    pub fn settings(&self) -> InvocationSettings {
        InvocationSettings {
            source: self.chocolatey.source.clone(),
            options: self.chocolatey.options.clone(),
            timeout: Duration::from_secs(self.chocolatey.timeout_secs),
        }
    }

    /// Serialize the model to TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Parse a command-line spec like "git@2.40.0" or just "git"
pub fn parse_package_spec(spec: &str) -> Result<PackageSpec> {
    let (name, version) = match spec.split_once('@') {
        Some((name, version)) => (name, Some(version)),
        None => (spec, None),
    };

    if name.trim().is_empty() {
        return Err(Error::InvalidRequest(format!("missing package name in '{}'", spec)));
    }
    if version.is_some_and(|v| v.trim().is_empty()) {
        return Err(Error::InvalidRequest(format!("missing version in '{}'", spec)));
    }

    Ok(PackageSpec::new(name.trim(), version.map(|v| v.trim().to_string())))
}

/// Parse a package model from a TOML file
pub fn parse_model_file(path: &Path) -> Result<PackageModel> {
    let content = std::fs::read_to_string(path)?;
    parse_model_string(&content)
}

/// Parse a package model from a TOML string
pub fn parse_model_string(content: &str) -> Result<PackageModel> {
    let model: PackageModel =
        toml::from_str(content).map_err(|e| Error::ConfigError(e.to_string()))?;
    model.validate()?;
    Ok(model)
}
