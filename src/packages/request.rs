// src/packages/request.rs

//! Declared package requests and their desired name -> version mapping
//!
//! A [`PackageRequest`] is what the caller declares: an ordered list of
//! package names plus an optional, index-aligned list of version pins.
//! [`resolve_desired`] pairs the two into a [`DesiredMap`], refusing to
//! silently truncate when the lists disagree in length.

use crate::error::{Error, Result};
use tracing::warn;

/// Package names plus optional per-package version pins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRequest {
    /// Package names exactly as declared
    pub names: Vec<String>,
    /// Desired versions, index-aligned with `names`; `None` means no pins at all
    pub versions: Option<Vec<Option<String>>>,
}

impl PackageRequest {
    /// A request with no version pins
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            versions: None,
        }
    }

    /// A request with an explicit version list
    pub fn with_versions(names: Vec<String>, versions: Vec<Option<String>>) -> Self {
        Self {
            names,
            versions: Some(versions),
        }
    }

    /// Check if the request names no packages
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Declared name -> optional version, in declaration order
///
/// Keys keep the spelling of their first declaration, but every lookup is
/// case-insensitive since Chocolatey package ids are. Re-declaring a name in
/// any case replaces its version but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredMap {
    entries: Vec<(String, Option<String>)>,
}

impl DesiredMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the desired version for `name`
    pub fn insert(&mut self, name: String, version: Option<String>) {
        match self.entries.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(entry) => {
                if entry.1 != version {
                    warn!(
                        "Package '{}' declared again as '{}', using version {}",
                        entry.0,
                        name,
                        version.as_deref().unwrap_or("(any)")
                    );
                }
                entry.1 = version;
            }
            None => self.entries.push((name, version)),
        }
    }

    /// Check if `name` was declared
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Pinned version for `name`, if declared with one
    pub fn version(&self, name: &str) -> Option<&str> {
        self.entry(name).and_then(|(_, v)| v.as_deref())
    }

    fn entry(&self, name: &str) -> Option<&(String, Option<String>)> {
        self.entries.iter().find(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Iterate entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only entries whose name is in `names`, preserving map order
    ///
    /// Matching ignores case and the declared spelling is kept. Names in
    /// `names` that were never declared are dropped.
    pub fn restrict<S: AsRef<str>>(&self, names: &[S]) -> DesiredMap {
        for name in names {
            if !self.contains(name.as_ref()) {
                warn!("Package '{}' is not part of the declared request, skipping", name.as_ref());
            }
        }

        let entries = self
            .entries
            .iter()
            .filter(|(n, _)| names.iter().any(|s| n.eq_ignore_ascii_case(s.as_ref())))
            .cloned()
            .collect();

        DesiredMap { entries }
    }
}

/// Pair a request's names with its versions
pub fn resolve_desired(request: &PackageRequest) -> Result<DesiredMap> {
    let mut desired = DesiredMap::new();

    match &request.versions {
        None => {
            for name in &request.names {
                desired.insert(name.clone(), None);
            }
        }
        Some(versions) => {
            if versions.len() != request.names.len() {
                return Err(Error::InvalidRequest(format!(
                    "{} package names but {} versions",
                    request.names.len(),
                    versions.len()
                )));
            }
            for (name, version) in request.names.iter().zip(versions) {
                desired.insert(name.clone(), version.clone());
            }
        }
    }

    Ok(desired)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_versions_means_no_pins() {
        let request = PackageRequest::new(names(&["git", "7zip", "nodejs"]));
        let desired = resolve_desired(&request).unwrap();

        assert_eq!(desired.len(), 3);
        assert!(desired.iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn test_versions_zip_positionally() {
        let request = PackageRequest::with_versions(
            names(&["git", "7zip"]),
            vec![Some("2.40.0".to_string()), None],
        );
        let desired = resolve_desired(&request).unwrap();

        assert_eq!(desired.version("git"), Some("2.40.0"));
        assert_eq!(desired.version("7zip"), None);
        assert!(desired.contains("7zip"));
    }

    #[test]
    fn test_length_mismatch_is_invalid() {
        let request = PackageRequest::with_versions(
            names(&["git", "7zip"]),
            vec![Some("2.40.0".to_string())],
        );
        let err = resolve_desired(&request).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_keys_keep_declared_case() {
        let request = PackageRequest::new(names(&["Git"]));
        let desired = resolve_desired(&request).unwrap();

        assert!(desired.contains("git"));
        assert!(desired.contains("GIT"));
        assert_eq!(desired.iter().next(), Some(("Git", None)));
    }

    #[test]
    fn test_redeclared_name_in_other_case_is_one_entry() {
        let request = PackageRequest::with_versions(
            names(&["Git", "7zip", "git"]),
            vec![Some("2.40.0".to_string()), None, Some("2.39.0".to_string())],
        );
        let desired = resolve_desired(&request).unwrap();

        let order: Vec<_> = desired.iter().collect();
        assert_eq!(order, vec![("Git", Some("2.39.0")), ("7zip", None)]);
    }

    #[test]
    fn test_restrict_ignores_case() {
        let request = PackageRequest::with_versions(
            names(&["Git", "7zip"]),
            vec![Some("2.40.0".to_string()), None],
        );
        let desired = resolve_desired(&request).unwrap();

        let subset = desired.restrict(&["GIT"]);
        let order: Vec<_> = subset.iter().collect();
        assert_eq!(order, vec![("Git", Some("2.40.0"))]);
    }

    #[test]
    fn test_redeclared_name_keeps_first_position() {
        let mut desired = DesiredMap::new();
        desired.insert("a".to_string(), None);
        desired.insert("b".to_string(), None);
        desired.insert("a".to_string(), Some("1.0".to_string()));

        let order: Vec<_> = desired.iter().collect();
        assert_eq!(order, vec![("a", Some("1.0")), ("b", None)]);
    }

    #[test]
    fn test_restrict_preserves_map_order() {
        let request = PackageRequest::new(names(&["a", "b", "c"]));
        let desired = resolve_desired(&request).unwrap();

        let subset = desired.restrict(&["c", "a", "zzz"]);
        let order: Vec<_> = subset.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["a", "c"]);
    }
}
