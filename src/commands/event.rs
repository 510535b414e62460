//! `tally event` commands - active event, closing and history

use chrono::Local;
use serde_json::json;
use tally_core::error::{Result, TallyError};
use tally_core::model::Event;
use tally_core::records::escape_quotes;
use tally_core::store::Store;

use crate::cli::Cli;
use crate::commands::format::{
    output_by_format_result, print_json, print_json_status, print_records_header,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn human_line(event: &Event) -> String {
    let mut line = format!(
        "{:>4}  {:<9}  {}  created {}",
        event.id,
        event.status,
        event.name,
        event.created_at.with_timezone(&Local).format(TIME_FORMAT)
    );
    if let Some(completed) = event.completed_at {
        line.push_str(&format!(
            ", completed {}",
            completed.with_timezone(&Local).format(TIME_FORMAT)
        ));
    }
    line
}

fn record_line(event: &Event) -> String {
    format!(
        "E {} status={} created={} \"{}\"",
        event.id,
        event.status,
        event.created_at.to_rfc3339(),
        escape_quotes(&event.name)
    )
}

pub fn show_active(cli: &Cli, store: &Store) -> Result<()> {
    let event = store.active_event()?;

    output_by_format_result!(cli.format,
        json => print_json(&event),
        human => {
            println!("{}", human_line(&event));
        },
        records => {
            print_records_header("event", &[]);
            println!("{}", record_line(&event));
        }
    )
}

pub fn list(cli: &Cli, store: &Store) -> Result<()> {
    let events = store.db().list_events()?;

    output_by_format_result!(cli.format,
        json => print_json(&events),
        human => {
            for event in &events {
                println!("{}", human_line(event));
            }
        },
        records => {
            print_records_header("events", &[("count", &events.len().to_string())]);
            for event in &events {
                println!("{}", record_line(event));
            }
        }
    )
}

pub fn close(cli: &Cli, store: &Store) -> Result<()> {
    let (closed, started) = store.close_active_event()?;

    output_by_format_result!(cli.format,
        json => {
            print_json_status(
                "ok",
                None,
                &[("closed", json!(closed)), ("started", json!(started))],
            )?;
            Ok::<(), TallyError>(())
        },
        human => {
            println!("Closed event {} ({})", closed.id, closed.name);
            println!("Started event {} ({})", started.id, started.name);
        },
        records => {
            print_records_header("close", &[("status", "ok")]);
            println!("{}", record_line(&closed));
            println!("{}", record_line(&started));
        }
    )
}

pub fn history(cli: &Cli, store: &Store) -> Result<()> {
    let completed = store.db().completed_competitions()?;

    output_by_format_result!(cli.format,
        json => print_json(&completed),
        human => {
            if completed.is_empty() && !cli.quiet {
                println!("No fully locked competitions yet");
            }
            for entry in &completed {
                println!(
                    "event {} ({})  competition {} ({})  {} scores",
                    entry.event.id,
                    entry.event.name,
                    entry.competition_id,
                    entry.competition,
                    entry.expected_scores
                );
            }
        },
        records => {
            print_records_header("history", &[("count", &completed.len().to_string())]);
            for entry in &completed {
                println!(
                    "C event={} competition={} scores={} \"{}\"",
                    entry.event.id,
                    entry.competition_id,
                    entry.expected_scores,
                    escape_quotes(&entry.competition)
                );
            }
        }
    )
}
