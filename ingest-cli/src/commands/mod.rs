//! CLI command implementations

pub mod clone;
pub mod remote;

pub use clone::CloneArgs;
pub use remote::{BranchesArgs, ExistsArgs};
