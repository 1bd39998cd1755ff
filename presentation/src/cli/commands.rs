//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for pipeline results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Pretty,
    /// JSON output
    Json,
}

/// Transport override from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TransportArg {
    /// In-process tool registry
    Local,
    /// Remote tool runner over HTTP
    Http,
}

/// CLI arguments for herald
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(author, version, about = "Turn an utterance into a chat reply or one whitelisted command")]
#[command(long_about = r#"
Herald resolves a free-form utterance into either a conversational reply
or the execution of exactly one pre-approved operation.

The pipeline has three stages:
1. Resolve: quick rules, then the remote resolver, then the legacy router
2. Plan: map the command to an ACL-tagged, confirmation-gated plan
3. Execute: run the plan's steps against the configured transport

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./herald.toml       Project-level config
3. ~/.config/herald/config.toml   Global config

Example:
  herald "прочитай файл notes.txt"
  herald --yes "создай файл note.txt с содержимым привет"
  herald --chat
"#)]
pub struct Cli {
    /// The utterance to handle (not required in chat mode)
    pub utterance: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Explicit config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip config files and use built-in defaults
    #[arg(long)]
    pub no_config: bool,

    /// Supply confirmation for side-effecting commands
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Explicit confirmation level (overrides --yes)
    #[arg(long, value_name = "LEVEL")]
    pub confirm_level: Option<u8>,

    /// Transport override
    #[arg(long, value_enum)]
    pub transport: Option<TransportArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub output: OutputFormat,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Confirmation level derived from the flags.
    pub fn confirmation_level(&self) -> u8 {
        self.confirm_level.unwrap_or(u8::from(self.yes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_one_shot() {
        let cli = Cli::parse_from(["herald", "прочитай файл a.txt"]);
        assert_eq!(cli.utterance.as_deref(), Some("прочитай файл a.txt"));
        assert!(!cli.chat);
        assert_eq!(cli.confirmation_level(), 0);
    }

    #[test]
    fn test_yes_sets_level_one() {
        let cli = Cli::parse_from(["herald", "-y", "создай файл a.txt"]);
        assert_eq!(cli.confirmation_level(), 1);
    }

    #[test]
    fn test_explicit_level_wins() {
        let cli = Cli::parse_from(["herald", "--confirm-level", "2", "-y", "x"]);
        assert_eq!(cli.confirmation_level(), 2);
    }
}
