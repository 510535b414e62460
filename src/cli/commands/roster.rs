//! Roster command argument structures

use clap::{Args, Subcommand};

/// Competition subcommands
#[derive(Subcommand, Debug)]
pub enum CompetitionCommands {
    /// Add a competition
    Add {
        /// Competition name
        name: String,
    },

    /// List competitions
    List,
}

/// Judge subcommands
#[derive(Subcommand, Debug)]
pub enum JudgeCommands {
    /// Add a judge
    Add(JudgeAddArgs),

    /// Assign an existing judge to another competition
    Assign {
        /// Judge id
        judge: i64,

        /// Competition id or slug
        #[arg(long, short)]
        competition: String,
    },

    /// List judges assigned to a competition
    List(CompetitionArg),
}

#[derive(Args, Debug)]
pub struct JudgeAddArgs {
    /// Judge name
    pub name: String,

    /// Competition id or slug (can be repeated)
    #[arg(long, short, action = clap::ArgAction::Append, required = true)]
    pub competition: Vec<String>,
}

/// Contestant subcommands
#[derive(Subcommand, Debug)]
pub enum ContestantCommands {
    /// Add a contestant
    Add {
        /// Contestant name
        name: String,

        /// Competition id or slug
        #[arg(long, short)]
        competition: String,
    },

    /// List contestants of a competition
    List(CompetitionArg),
}

/// Criterion subcommands
#[derive(Subcommand, Debug)]
pub enum CriterionCommands {
    /// Add a criterion
    Add(CriterionAddArgs),

    /// List criteria of a competition
    List(CompetitionArg),
}

#[derive(Args, Debug)]
pub struct CriterionAddArgs {
    /// Criterion name
    pub name: String,

    /// Competition id or slug
    #[arg(long, short)]
    pub competition: String,

    /// Highest raw score a judge may give
    #[arg(long)]
    pub max: f64,

    /// Percentage points this criterion contributes to the total
    #[arg(long)]
    pub weight: f64,
}

#[derive(Args, Debug)]
pub struct CompetitionArg {
    /// Competition id or slug
    #[arg(long, short)]
    pub competition: String,
}
