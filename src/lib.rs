//! rescat - resource catalog for AI coding platforms
//!
//! Indexes a catalog of installable resources (agents, commands, hooks,
//! templates, MCP servers), answers exact, prefix and fuzzy searches,
//! resolves dependency closures into install order, and installs a plan
//! with concurrent fetches, atomic writes and optional rollback.
//!
//! The core is synchronous except for the installer's fetches. The
//! `rescat` binary is a thin command line front end over
//! [`operations::CatalogService`].

pub mod cache;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod hash;
pub mod installer;
pub mod operations;
pub mod resolver;
pub mod search;
pub mod source;
pub mod transaction;

pub use error::{RescatError, Result};
