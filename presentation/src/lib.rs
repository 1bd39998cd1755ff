//! Presentation layer for herald
//!
//! This crate contains the CLI definition, the console formatter for
//! pipeline outcomes, and the interactive REPL with its confirmation
//! prompt.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::Repl;
pub use cli::commands::{Cli, OutputFormat, TransportArg};
pub use output::console::ConsoleFormatter;
