//! CLI layer for scholar-rs.
//!
//! Provides the command-line interface using clap, with commands for
//! one-shot questions, an interactive loop, and direct publication search.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands, SearchOpts};
