//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`resolve`] - One-shot point resolution
//! - [`saved`] - Saved selections (list, export-url)
//! - [`session`] - Interactive selection session

pub mod common;
pub mod config;
pub mod resolve;
pub mod saved;
pub mod session;
