//! Ingest Core - Core library for ingesting remote git repositories
//!
//! This crate materializes a remote repository into a local working copy
//! (default branch, named branch, tag or specific commit, optionally narrowed
//! to a subtree) by driving the `git` executable, with per-invocation token
//! auth and one deadline over the whole operation.

pub mod clone;
pub mod config;
pub mod error;
pub mod git;
pub mod secrets;

pub use clone::{CloneConfig, ClonePlan, Cloner, DEFAULT_TIMEOUT};
pub use config::Config;
pub use error::{Error, Result};
pub use git::{CommandRunner, GitCommand, ProcessRunner};
pub use secrets::Secrets;
