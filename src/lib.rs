//! `bugbook` - file-backed bug tracker
//!
//! This crate provides the `bb` CLI on top of the `bugbook_lib` storage
//! core.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`], [`store`], [`users`], [`codec`] - Storage core (re-exported)
//! - [`config`] - Layered YAML configuration
//! - [`validation`] - Field checks run before records reach a store
//! - [`format`] - Output formatting (text, JSON)
//! - [`attachments`], [`email`], [`source`] - Collaborators around the stores
//! - [`logging`] - tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod attachments;
pub mod cli;
pub mod config;
pub mod email;
pub mod format;
pub mod logging;
pub mod source;
pub mod validation;

pub use bugbook_lib::{codec, error, model, store, users, util};
pub use error::{BugbookError, Result};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if configuration, logging setup or the command fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
