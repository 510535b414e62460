//! Scoring and results command argument structures

use std::path::PathBuf;

use clap::Args;

use crate::cli::parse::{parse_score, ScoreArg};

#[derive(Args, Debug)]
pub struct BallotArgs {
    /// Competition id or slug
    #[arg(long, short)]
    pub competition: String,

    /// Judge id or name
    #[arg(long, short)]
    pub judge: String,

    /// Contestant id or name
    #[arg(long = "contestant", short = 'n')]
    pub contestant: String,

    /// Score as CRITERION=VALUE, criterion by id or name (repeat for each criterion)
    #[arg(long, short, action = clap::ArgAction::Append, value_parser = parse_score)]
    pub score: Vec<ScoreArg>,
}

#[derive(Args, Debug)]
pub struct EnterArgs {
    /// Competition id or slug
    #[arg(long, short)]
    pub competition: String,

    /// Judge id or name the scores belong to
    #[arg(long, short)]
    pub judge: String,

    /// Contestant id or name
    #[arg(long = "contestant", short = 'n')]
    pub contestant: String,

    /// Score as CRITERION=VALUE, criterion by id or name (can be repeated)
    #[arg(long, short, action = clap::ArgAction::Append, value_parser = parse_score)]
    pub score: Vec<ScoreArg>,

    /// Lock the contestant once every judge x criterion score is present
    #[arg(long)]
    pub lock: bool,

    /// Tabulator name recorded with the entries
    #[arg(long = "as", default_value = "tabulator")]
    pub tabulator: String,
}

#[derive(Args, Debug)]
pub struct ScopeArgs {
    /// Competition id or slug
    #[arg(long, short)]
    pub competition: String,

    /// Event id (default: the active event)
    #[arg(long, short)]
    pub event: Option<i64>,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Output file path (default: results_<slug>_<event>.pdf)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}
