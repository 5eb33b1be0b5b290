//! Command implementations for rescat CLI
//!
//! Each command returns the process exit code; errors are printed by `main`.

pub mod browse;
pub mod cache;
pub mod categories;
pub mod helpers;
pub mod install;
pub mod plan;
pub mod search;
pub mod show;
pub mod version;
