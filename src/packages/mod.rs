// src/packages/mod.rs

//! Package request and package state support
//!
//! This module turns a caller's declaration into a desired name -> version
//! mapping and answers "which version is installed / available" against
//! memoized Chocolatey list output.

pub mod query;
pub mod request;

pub use query::{parse_list_output, ListPackages, PackageQueryCache, QueryView};
pub use request::{resolve_desired, DesiredMap, PackageRequest};
