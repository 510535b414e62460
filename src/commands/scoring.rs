//! Scoring commands - judge ballots, tabulator entry and lock status

use serde_json::json;
use tally_core::bail_usage;
use tally_core::error::{Result, TallyError};
use tally_core::lock::{LockState, WriteReceipt};
use tally_core::model::{Actor, Role};
use tally_core::store::Store;

use super::dispatch::{trace_command, CommandContext};
use crate::cli::commands::{BallotArgs, EnterArgs, ScopeArgs};
use crate::cli::Cli;
use crate::commands::format::{
    output_by_format_result, print_json, print_json_status, print_records_header,
};
use crate::commands::resolve;

fn print_receipt(cli: &Cli, mode: &str, receipt: &WriteReceipt) -> Result<()> {
    output_by_format_result!(cli.format,
        json => {
            print_json_status(
                "ok",
                None,
                &[
                    ("contestant", json!(receipt.contestant)),
                    ("entries", json!(receipt.entries)),
                    ("state", json!(receipt.state)),
                ],
            )?;
            Ok::<(), TallyError>(())
        },
        human => {
            let verb = if receipt.state == LockState::Locked {
                "locked"
            } else {
                "saved"
            };
            println!(
                "Contestant {} {} ({} scores written)",
                receipt.contestant,
                verb,
                receipt.entries.len()
            );
        },
        records => {
            print_records_header(mode, &[("status", "ok")]);
            println!(
                "S contestant={} entries={} state={}",
                receipt.contestant,
                receipt.entries.len(),
                receipt.state
            );
        }
    )
}

/// `tally ballot` - a judge's one-shot ballot into the active event
pub fn execute_ballot(ctx: &CommandContext, args: &BallotArgs) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    let competition = resolve::competition(&store, &args.competition)?;
    let judge = resolve::judge(&store, competition.id, &args.judge)?;
    let contestant = resolve::contestant(&store, competition.id, &args.contestant)?;
    let sheet = resolve::score_sheet(&store, competition.id, &args.score)?;
    let event = store.active_event()?;

    let actor = Actor::new(Role::Judge, judge.name.clone());
    let receipt = store.submit_judge_ballot(
        event.id,
        competition.id,
        judge.id,
        contestant.id,
        &sheet,
        &actor,
    )?;
    trace_command!(ctx.cli, ctx.start, "submit_ballot");

    print_receipt(ctx.cli, "ballot", &receipt)
}

/// `tally enter` - tabulator save, or save-and-lock with `--lock`
pub fn execute_enter(ctx: &CommandContext, args: &EnterArgs) -> Result<()> {
    if args.score.is_empty() && !args.lock {
        bail_usage!("nothing to do: pass --score and/or --lock");
    }

    let store = ctx.discover_or_open_store()?;
    let competition = resolve::competition(&store, &args.competition)?;
    let judge = resolve::judge(&store, competition.id, &args.judge)?;
    let contestant = resolve::contestant(&store, competition.id, &args.contestant)?;
    let sheet = resolve::score_sheet(&store, competition.id, &args.score)?;
    let event = store.active_event()?;

    let actor = Actor::new(Role::Tabulator, args.tabulator.clone());
    let receipt = store.save_or_lock_tabulator_entry(
        event.id,
        competition.id,
        judge.id,
        contestant.id,
        &sheet,
        args.lock,
        &actor,
    )?;
    trace_command!(ctx.cli, ctx.start, "save_or_lock");

    print_receipt(ctx.cli, "enter", &receipt)
}

/// `tally status` - lock progress of every contestant
pub fn execute_status(ctx: &CommandContext, args: &ScopeArgs) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    status(ctx.cli, &store, args)
}

fn status(cli: &Cli, store: &Store, args: &ScopeArgs) -> Result<()> {
    let competition = resolve::competition(store, &args.competition)?;
    let event = resolve::event(store, args.event)?;
    let statuses = store.lock_statuses(event.id, competition.id)?;
    let contestants = store.db().contestants_for(competition.id)?;

    output_by_format_result!(cli.format,
        json => print_json(&statuses),
        human => {
            println!("{} / {}", event.name, competition.name);
            for (status, contestant) in statuses.iter().zip(&contestants) {
                println!(
                    "{:>4}  {:<7}  {}/{}  {}",
                    status.contestant,
                    status.state,
                    status.present,
                    status.expected,
                    contestant.name
                );
            }
        },
        records => {
            print_records_header(
                "status",
                &[
                    ("event", &event.id.to_string()),
                    ("competition", &competition.id.to_string()),
                ],
            );
            for status in &statuses {
                println!(
                    "L contestant={} state={} present={} expected={}",
                    status.contestant, status.state, status.present, status.expected
                );
            }
        }
    )
}
