//! Command implementations for all tally commands

use tally_core::error::Result;

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        dispatch_command::execute(self, ctx)
    }
}

pub(super) mod dispatch_command {
    use super::*;

    use crate::cli::commands::{
        CompetitionCommands, ContestantCommands, CriterionCommands, EventCommands, JudgeCommands,
    };
    use crate::commands::{event, init, report, results, roster, scoring};

    pub(super) fn execute(cmd: &Commands, ctx: &CommandContext) -> Result<()> {
        match cmd {
            Commands::Init => init::execute(ctx.cli, ctx.root),
            Commands::Event { command } => execute_event(ctx, command),
            Commands::Competition { command } => execute_competition(ctx, command),
            Commands::Judge { command } => execute_judge(ctx, command),
            Commands::Contestant { command } => execute_contestant(ctx, command),
            Commands::Criterion { command } => execute_criterion(ctx, command),
            Commands::Ballot(args) => scoring::execute_ballot(ctx, args),
            Commands::Enter(args) => scoring::execute_enter(ctx, args),
            Commands::Status(args) => scoring::execute_status(ctx, args),
            Commands::Results(args) => results::execute_results(ctx, args),
            Commands::Breakdown(args) => results::execute_breakdown(ctx, args),
            Commands::Report(args) => report::execute(ctx, args),
        }
    }

    fn execute_event(ctx: &CommandContext, command: &EventCommands) -> Result<()> {
        let store = ctx.discover_or_open_store()?;
        match command {
            EventCommands::Active => event::show_active(ctx.cli, &store),
            EventCommands::List => event::list(ctx.cli, &store),
            EventCommands::Close => event::close(ctx.cli, &store),
            EventCommands::History => event::history(ctx.cli, &store),
        }
    }

    fn execute_competition(ctx: &CommandContext, command: &CompetitionCommands) -> Result<()> {
        let store = ctx.discover_or_open_store()?;
        match command {
            CompetitionCommands::Add { name } => roster::add_competition(ctx.cli, &store, name),
            CompetitionCommands::List => roster::list_competitions(ctx.cli, &store),
        }
    }

    fn execute_judge(ctx: &CommandContext, command: &JudgeCommands) -> Result<()> {
        let store = ctx.discover_or_open_store()?;
        match command {
            JudgeCommands::Add(args) => {
                roster::add_judge(ctx.cli, &store, &args.name, &args.competition)
            }
            JudgeCommands::Assign { judge, competition } => {
                roster::assign_judge(ctx.cli, &store, *judge, competition)
            }
            JudgeCommands::List(args) => roster::list_judges(ctx.cli, &store, &args.competition),
        }
    }

    fn execute_contestant(ctx: &CommandContext, command: &ContestantCommands) -> Result<()> {
        let store = ctx.discover_or_open_store()?;
        match command {
            ContestantCommands::Add { name, competition } => {
                roster::add_contestant(ctx.cli, &store, name, competition)
            }
            ContestantCommands::List(args) => {
                roster::list_contestants(ctx.cli, &store, &args.competition)
            }
        }
    }

    fn execute_criterion(ctx: &CommandContext, command: &CriterionCommands) -> Result<()> {
        let store = ctx.discover_or_open_store()?;
        match command {
            CriterionCommands::Add(args) => roster::add_criterion(ctx.cli, &store, args),
            CriterionCommands::List(args) => {
                roster::list_criteria(ctx.cli, &store, &args.competition)
            }
        }
    }
}
