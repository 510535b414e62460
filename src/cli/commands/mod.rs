//! Main CLI commands enum

use clap::Subcommand;

pub mod roster;
pub mod scoring;

pub use roster::*;
pub use scoring::*;

/// Top-level tally commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new tally store
    Init,

    /// Inspect, close and browse events
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },

    /// Manage competitions
    Competition {
        #[command(subcommand)]
        command: CompetitionCommands,
    },

    /// Manage judges and their competition assignments
    Judge {
        #[command(subcommand)]
        command: JudgeCommands,
    },

    /// Manage contestants
    Contestant {
        #[command(subcommand)]
        command: ContestantCommands,
    },

    /// Manage scoring criteria
    Criterion {
        #[command(subcommand)]
        command: CriterionCommands,
    },

    /// Submit a judge's complete ballot for one contestant
    Ballot(BallotArgs),

    /// Save tabulator-entered scores, optionally locking the contestant
    Enter(EnterArgs),

    /// Show lock progress per contestant
    Status(ScopeArgs),

    /// Show ranked results
    Results(ScopeArgs),

    /// Show each judge's scores
    Breakdown(ScopeArgs),

    /// Render ranked results as a PDF report
    Report(ReportArgs),
}

/// Event subcommands
#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// Show the active event
    Active,

    /// List all events
    List,

    /// Complete the active event and start a new one
    Close,

    /// List competitions fully locked in completed or active events
    History,
}
