//! Immutable git invocations
//!
//! A [`GitCommand`] is a program plus a discrete argument vector. It is never
//! passed through a shell. Its `Display` and `Debug` output redact the value
//! of any `extraheader` config override so tokens cannot reach logs or errors.

use std::fmt;
use std::path::{Path, PathBuf};

/// Marker identifying an auth header config override
const EXTRA_HEADER_KEY: &str = ".extraheader=";

/// A single invocation of an external command
#[derive(Clone, PartialEq, Eq)]
pub struct GitCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl GitCommand {
    /// Start building a command for the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command from a specific directory
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// The program to execute
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The argument vector, unredacted
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// The working directory, if any
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Whether the argument vector contains `arg` exactly
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// The value following `flag`, e.g. `--branch <value>`
    pub fn arg_after(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// Arguments with auth header values masked
    pub fn redacted_args(&self) -> Vec<String> {
        self.args.iter().map(|a| redact(a)).collect()
    }
}

fn redact(arg: &str) -> String {
    match arg.to_ascii_lowercase().find(EXTRA_HEADER_KEY) {
        Some(idx) => format!("{}<redacted>", &arg[..idx + EXTRA_HEADER_KEY.len()]),
        None => arg.to_string(),
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in self.redacted_args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl fmt::Debug for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitCommand")
            .field("program", &self.program)
            .field("args", &self.redacted_args())
            .field("current_dir", &self.current_dir)
            .finish()
    }
}
