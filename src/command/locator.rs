// src/command/locator.rs

//! Locate the Chocolatey executable

use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable set by the Chocolatey installer
pub const INSTALL_DIR_ENV: &str = "ChocolateyInstall";

/// Install directory used when nothing else is found
pub const DEFAULT_INSTALL_DIR: &str = r"C:\ProgramData\chocolatey";

const EXECUTABLE: &str = "choco.exe";

/// Resolves the absolute path to the package-manager binary
pub trait BinaryLocator {
    fn locate(&self) -> Result<PathBuf>;
}

/// Finds `choco.exe` the way the Chocolatey installer lays it out
///
/// Order: explicit override, `%ChocolateyInstall%\choco.exe`, `choco` on
/// `PATH`, then the default install directory.
#[derive(Debug, Clone, Default)]
pub struct ChocolateyLocator {
    override_path: Option<PathBuf>,
}

impl ChocolateyLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `path` instead of searching
    pub fn with_override(path: impl Into<PathBuf>) -> Self {
        Self {
            override_path: Some(path.into()),
        }
    }

    fn locate_with(&self, install_dir: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = &self.override_path {
            return if path.is_file() {
                Ok(path.clone())
            } else {
                Err(Error::BinaryNotFound(format!(
                    "configured binary {} does not exist",
                    path.display()
                )))
            };
        }

        if let Some(dir) = install_dir {
            let candidate = dir.join(EXECUTABLE);
            if candidate.is_file() {
                debug!("Found {} via {}", candidate.display(), INSTALL_DIR_ENV);
                return Ok(candidate);
            }
        }

        if let Ok(path) = which::which("choco") {
            debug!("Found {} on PATH", path.display());
            return Ok(path);
        }

        let fallback = Path::new(DEFAULT_INSTALL_DIR).join(EXECUTABLE);
        if fallback.is_file() {
            return Ok(fallback);
        }

        Err(Error::BinaryNotFound(format!(
            "{} not found via {}, PATH, or {}",
            EXECUTABLE, INSTALL_DIR_ENV, DEFAULT_INSTALL_DIR
        )))
    }
}

impl BinaryLocator for ChocolateyLocator {
    fn locate(&self) -> Result<PathBuf> {
        let install_dir = env::var_os(INSTALL_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        self.locate_with(install_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("custom-choco.exe");
        fs::write(&custom, b"").unwrap();

        let other = tempfile::tempdir().unwrap();
        fs::write(other.path().join(EXECUTABLE), b"").unwrap();

        let locator = ChocolateyLocator::with_override(&custom);
        let found = locator.locate_with(Some(other.path().to_path_buf())).unwrap();
        assert_eq!(found, custom);
    }

    #[test]
    fn test_missing_override_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ChocolateyLocator::with_override(dir.path().join("nope.exe"));

        let err = locator.locate_with(None).unwrap_err();
        assert!(matches!(err, Error::BinaryNotFound(_)));
    }

    #[test]
    fn test_install_dir_env() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(EXECUTABLE), b"").unwrap();

        let found = ChocolateyLocator::new()
            .locate_with(Some(dir.path().to_path_buf()))
            .unwrap();
        assert_eq!(found, dir.path().join(EXECUTABLE));
    }
}
