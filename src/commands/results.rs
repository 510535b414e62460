//! `tally results` and `tally breakdown`

use serde_json::json;
use tally_core::error::{Result, TallyError};
use tally_core::model::CriterionField;
use tally_core::records::escape_quotes;
use tally_core::report::paint::{criterion_cell, total_cell};

use super::dispatch::{trace_command, CommandContext};
use crate::cli::commands::ScopeArgs;
use crate::commands::format::{output_by_format_result, print_json, print_records_header};
use crate::commands::resolve;

fn header_line(fields: &[CriterionField], lead: &str, tail: &str) -> String {
    let mut line = lead.to_string();
    for field in fields {
        line.push_str(&format!("  {}", field.label));
    }
    line.push_str("  ");
    line.push_str(tail);
    line
}

/// `tally results` - ranked weighted totals
pub fn execute_results(ctx: &CommandContext, args: &ScopeArgs) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    let competition = resolve::competition(&store, &args.competition)?;
    let event = resolve::event(&store, args.event)?;
    let fields = store.criterion_fields(competition.id)?;
    let results = store.get_results(event.id, competition.id)?;
    trace_command!(ctx.cli, ctx.start, "get_results");

    output_by_format_result!(ctx.cli.format,
        json => {
            print_json(&json!({
                "event": event,
                "competition": competition,
                "criteria": fields,
                "results": results,
            }))?;
            Ok::<(), TallyError>(())
        },
        human => {
            println!("{} / {}", event.name, competition.name);
            if results.is_empty() {
                println!("No results yet");
            } else {
                println!("{}", header_line(&fields, "Rank  Contestant", "Total"));
            }
            for (index, row) in results.iter().enumerate() {
                let mut line = format!("{:>4}  {}", index + 1, row.contestant);
                for field in &fields {
                    let weighted = row.per_criterion_weighted.get(&field.id).copied().unwrap_or(0.0);
                    let raw = row.per_criterion_raw.get(&field.id).copied().unwrap_or(0.0);
                    line.push_str(&format!("  {}", criterion_cell(weighted, raw)));
                }
                line.push_str(&format!("  {}", total_cell(row.total_weighted)));
                println!("{}", line);
            }
        },
        records => {
            print_records_header(
                "results",
                &[
                    ("event", &event.id.to_string()),
                    ("competition", &competition.id.to_string()),
                    ("count", &results.len().to_string()),
                ],
            );
            for (index, row) in results.iter().enumerate() {
                println!(
                    "R {} contestant={} total={:.4} raw={:.4} \"{}\"",
                    index + 1,
                    row.contestant_id,
                    row.total_weighted,
                    row.total_raw,
                    escape_quotes(&row.contestant)
                );
                for field in &fields {
                    println!(
                        "C {} criterion={} weighted={:.4} raw={:.4}",
                        row.contestant_id,
                        field.id,
                        row.per_criterion_weighted.get(&field.id).copied().unwrap_or(0.0),
                        row.per_criterion_raw.get(&field.id).copied().unwrap_or(0.0)
                    );
                }
            }
        }
    )
}

/// `tally breakdown` - every judge's raw scores per contestant
pub fn execute_breakdown(ctx: &CommandContext, args: &ScopeArgs) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    let competition = resolve::competition(&store, &args.competition)?;
    let event = resolve::event(&store, args.event)?;
    let fields = store.criterion_fields(competition.id)?;
    let breakdown = store.get_judge_breakdown(event.id, competition.id)?;
    trace_command!(ctx.cli, ctx.start, "get_judge_breakdown");

    output_by_format_result!(ctx.cli.format,
        json => {
            print_json(&json!({
                "event": event,
                "competition": competition,
                "criteria": fields,
                "judges": breakdown,
            }))?;
            Ok::<(), TallyError>(())
        },
        human => {
            println!("{} / {}", event.name, competition.name);
            if breakdown.is_empty() {
                println!("No scores yet");
            }
            for judge in &breakdown {
                println!();
                println!("Judge: {}", judge.judge);
                println!("{}", header_line(&fields, "Contestant", "Total"));
                for row in &judge.rows {
                    let mut line = row.contestant.clone();
                    for field in &fields {
                        match row.raw.get(&field.id).copied().flatten() {
                            Some(raw) => line.push_str(&format!("  {:.2}", raw)),
                            None => line.push_str("  -"),
                        }
                    }
                    line.push_str(&format!("  {}", total_cell(row.total)));
                    println!("{}", line);
                }
            }
        },
        records => {
            print_records_header(
                "breakdown",
                &[
                    ("event", &event.id.to_string()),
                    ("competition", &competition.id.to_string()),
                    ("judges", &breakdown.len().to_string()),
                ],
            );
            for judge in &breakdown {
                println!("J {} \"{}\"", judge.judge_id, escape_quotes(&judge.judge));
                for row in &judge.rows {
                    let cells: Vec<String> = fields
                        .iter()
                        .map(|field| match row.raw.get(&field.id).copied().flatten() {
                            Some(raw) => format!("{}={:.4}", field.id, raw),
                            None => format!("{}=-", field.id),
                        })
                        .collect();
                    println!(
                        "B judge={} contestant={} total={:.4} {}",
                        judge.judge_id,
                        row.contestant_id,
                        row.total,
                        cells.join(" ")
                    );
                }
            }
        }
    )
}
