// src/command/mod.rs

//! Package-manager command lines and their execution
//!
//! - [`CommandLine`] is a plain value describing one invocation; rendering
//!   it is pure so formatting can be tested without spawning anything.
//! - [`runner`] executes rendered lines with a timeout.
//! - [`locator`] finds `choco.exe`.
//! - [`choco`] ties the three together for list queries and planned actions.

pub mod choco;
pub mod locator;
pub mod runner;

use std::fmt;

pub use choco::{Chocolatey, InvocationSettings, DEFAULT_TIMEOUT};
pub use locator::{BinaryLocator, ChocolateyLocator};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};

/// Join argument tokens with single spaces
///
/// Absent and blank tokens are dropped entirely, so the result never has
/// leading, trailing or doubled separators.
pub fn join_args<I, S>(args: I) -> String
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for arg in args.into_iter().flatten() {
        let arg = arg.as_ref().trim();
        if arg.is_empty() {
            continue;
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(arg);
    }
    line
}

/// One package-manager invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Path to the package-manager executable
    pub binary: String,
    /// Subcommand, e.g. `install`
    pub verb: String,
    /// Fixed flags such as `-y`
    pub flags: Vec<String>,
    /// Exact version pin, rendered as `-version <ver>`
    pub version: Option<String>,
    /// Free-form options string passed through verbatim
    pub options: Option<String>,
    /// Repository scope, rendered as `-source <repo>`
    pub source: Option<String>,
    /// Package names
    pub targets: Vec<String>,
}

impl CommandLine {
    pub fn new(binary: impl Into<String>, verb: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            verb: verb.into(),
            flags: Vec::new(),
            version: None,
            options: None,
            source: None,
            targets: Vec::new(),
        }
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn version(mut self, version: Option<impl Into<String>>) -> Self {
        self.version = version.map(Into::into);
        self
    }

    pub fn options(mut self, options: Option<impl Into<String>>) -> Self {
        self.options = options.map(Into::into);
        self
    }

    pub fn source(mut self, source: Option<impl Into<String>>) -> Self {
        self.source = source.map(Into::into);
        self
    }

    pub fn target(mut self, name: impl Into<String>) -> Self {
        self.targets.push(name.into());
        self
    }

    pub fn targets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets.extend(names.into_iter().map(Into::into));
        self
    }

    /// Render to a single space-joined command line
    pub fn render(&self) -> String {
        // Paths under "Program Files" and friends need quoting for the shell
        let binary = if self.binary.contains(char::is_whitespace) {
            format!("\"{}\"", self.binary)
        } else {
            self.binary.clone()
        };

        let mut tokens: Vec<Option<String>> = vec![Some(binary), Some(self.verb.clone())];
        tokens.extend(self.flags.iter().cloned().map(Some));
        tokens.push(self.version.as_ref().map(|v| format!("-version {}", v)));
        tokens.push(self.options.clone());
        tokens.push(self.source.as_ref().map(|s| format!("-source {}", s)));
        tokens.extend(self.targets.iter().cloned().map(Some));

        join_args(tokens)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
