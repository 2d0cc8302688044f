// src/model/mod.rs

//! Package Model - Declarative Chocolatey State
//!
//! A package model declares which Chocolatey packages should be present and,
//! optionally, at which exact version. The engine compares the model against
//! installed state and plans the `choco` invocations needed to converge.
//!
//! # Example packages.toml
//!
//! ```toml
//! [chocolatey]
//! source = "internal"
//! options = "--no-progress"
//!
//! [[package]]
//! name = "git"
//! version = "2.40.0"
//!
//! [[package]]
//! name = "7zip"
//! ```

pub mod action;
pub mod parser;
mod diff;
mod plan;
mod state;

pub use action::Action;
pub use diff::{compute_diff, DiffAction, ModelDiff};
pub use parser::{
    default_model_path, parse_model_file, parse_model_string, parse_package_spec,
    ChocolateyConfig, PackageModel, PackageSpec, DEFAULT_MODEL_FILE,
};
pub use plan::{BatchPlanner, ALLOW_DOWNGRADE_FLAG, CONFIRM_FLAG};
pub use state::{zip_status, PackageStatus};
