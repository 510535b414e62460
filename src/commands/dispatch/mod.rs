//! Command dispatch logic for tally

use std::time::Instant;

use tally_core::error::Result;
use tracing::debug;

use crate::cli::paths::resolve_root_path;
use crate::cli::Cli;

mod command;
mod commands;
mod macros;

pub(crate) use command::CommandContext;
use command::{Command, NoCommand};
pub(crate) use macros::trace_command;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let root = resolve_root_path(cli.root.clone());

    debug!(elapsed = ?start.elapsed(), "resolve_root");

    let ctx = CommandContext::new(cli, &root, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
