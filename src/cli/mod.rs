//! CLI argument parsing for tally
//!
//! Global flags: --root, --store, --format, --quiet, --verbose,
//! --log-level, --log-json

pub mod commands;
pub mod format;
pub mod parse;
pub mod paths;

use std::path::PathBuf;

use clap::Parser;

pub use commands::Commands;
pub use tally_core::format::OutputFormat;

/// Tally - live competition scoring
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for resolving the store
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Explicit store root path
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Output format (human, json, records)
    #[arg(long, global = true, default_value = "human", value_parser = parse::parse_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Log timing and debug detail to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter (e.g. debug, tally_core=trace)
    #[arg(long, global = true, env = "TALLY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::commands::{EventCommands, JudgeCommands};
    use super::*;

    #[test]
    fn test_parse_cli_help() {
        let result = Cli::try_parse_from(["tally", "--help"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_init() {
        let cli = Cli::try_parse_from(["tally", "init"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Init)));
    }

    #[test]
    fn test_parse_format() {
        let cli = Cli::try_parse_from(["tally", "--format", "json", "results", "-c", "solo"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_bad_format() {
        assert!(Cli::try_parse_from(["tally", "--format", "yaml", "init"]).is_err());
    }

    #[test]
    fn test_parse_enter_with_scores() {
        let cli = Cli::try_parse_from([
            "tally",
            "enter",
            "--competition",
            "vocal-solo",
            "--judge",
            "Ada",
            "--contestant",
            "Alice",
            "--score",
            "Pitch=8.5",
            "--score",
            "2=4",
            "--lock",
        ])
        .unwrap();
        if let Some(Commands::Enter(args)) = cli.command {
            assert!(args.lock);
            assert_eq!(args.score.len(), 2);
            assert_eq!(args.score[0].criterion, "Pitch");
            assert_eq!(args.score[0].value, 8.5);
        } else {
            panic!("Expected Enter command");
        }
    }

    #[test]
    fn test_parse_event_history() {
        let cli = Cli::try_parse_from(["tally", "event", "history"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Event {
                command: EventCommands::History
            })
        ));
    }

    #[test]
    fn test_parse_judge_add_multiple_competitions() {
        let cli = Cli::try_parse_from([
            "tally", "judge", "add", "Ada", "-c", "solo", "-c", "duet",
        ])
        .unwrap();
        if let Some(Commands::Judge {
            command: JudgeCommands::Add(args),
        }) = cli.command
        {
            assert_eq!(args.competition, vec!["solo", "duet"]);
        } else {
            panic!("Expected judge add");
        }
    }
}
