//! Roster commands - competitions, judges, contestants and criteria

use tally_core::aggregate::MAX_TOTAL;
use tally_core::error::{Result, TallyError};
use tally_core::model::{format_number, JudgeId};
use tally_core::records::escape_quotes;
use tally_core::store::Store;

use crate::cli::commands::CriterionAddArgs;
use crate::cli::Cli;
use crate::commands::format::{output_by_format_result, print_json, print_records_header};
use crate::commands::resolve;

pub fn add_competition(cli: &Cli, store: &Store, name: &str) -> Result<()> {
    let competition = store.db().insert_competition(name)?;

    output_by_format_result!(cli.format,
        json => print_json(&competition),
        human => {
            println!("{}  {}  {}", competition.id, competition.slug, competition.name);
        },
        records => {
            print_records_header("competition", &[]);
            println!(
                "P {} slug={} \"{}\"",
                competition.id,
                competition.slug,
                escape_quotes(&competition.name)
            );
        }
    )
}

pub fn list_competitions(cli: &Cli, store: &Store) -> Result<()> {
    let competitions = store.db().list_competitions()?;

    output_by_format_result!(cli.format,
        json => print_json(&competitions),
        human => {
            if competitions.is_empty() && !cli.quiet {
                println!("No competitions");
            }
            for competition in &competitions {
                println!("{:>4}  {:<24}  {}", competition.id, competition.slug, competition.name);
            }
        },
        records => {
            print_records_header("competitions", &[("count", &competitions.len().to_string())]);
            for competition in &competitions {
                println!(
                    "P {} slug={} \"{}\"",
                    competition.id,
                    competition.slug,
                    escape_quotes(&competition.name)
                );
            }
        }
    )
}

pub fn add_judge(cli: &Cli, store: &Store, name: &str, competitions: &[String]) -> Result<()> {
    let ids = competitions
        .iter()
        .map(|reference| resolve::competition(store, reference).map(|c| c.id))
        .collect::<Result<Vec<_>>>()?;
    let judge = store.db().insert_judge(name, &ids)?;

    output_by_format_result!(cli.format,
        json => print_json(&judge),
        human => {
            println!("{}  {}", judge.id, judge.name);
        },
        records => {
            print_records_header("judge", &[]);
            println!("J {} \"{}\"", judge.id, escape_quotes(&judge.name));
        }
    )
}

pub fn assign_judge(cli: &Cli, store: &Store, judge: i64, competition: &str) -> Result<()> {
    let competition = resolve::competition(store, competition)?;
    let judge = store.db().assign_judge(JudgeId(judge), competition.id)?;

    output_by_format_result!(cli.format,
        json => print_json(&judge),
        human => {
            println!("Assigned {} to {}", judge.name, competition.name);
        },
        records => {
            print_records_header("assign", &[("competition", &competition.id.to_string())]);
            println!("J {} \"{}\"", judge.id, escape_quotes(&judge.name));
        }
    )
}

pub fn list_judges(cli: &Cli, store: &Store, competition: &str) -> Result<()> {
    let competition = resolve::competition(store, competition)?;
    let judges = store.db().judges_for(competition.id)?;

    output_by_format_result!(cli.format,
        json => print_json(&judges),
        human => {
            for judge in &judges {
                println!("{:>4}  {}", judge.id, judge.name);
            }
        },
        records => {
            print_records_header(
                "judges",
                &[
                    ("competition", &competition.id.to_string()),
                    ("count", &judges.len().to_string()),
                ],
            );
            for judge in &judges {
                println!("J {} \"{}\"", judge.id, escape_quotes(&judge.name));
            }
        }
    )
}

pub fn add_contestant(cli: &Cli, store: &Store, name: &str, competition: &str) -> Result<()> {
    let competition = resolve::competition(store, competition)?;
    let contestant = store.db().insert_contestant(competition.id, name)?;

    output_by_format_result!(cli.format,
        json => print_json(&contestant),
        human => {
            println!("{}  {}", contestant.id, contestant.name);
        },
        records => {
            print_records_header("contestant", &[]);
            println!("N {} \"{}\"", contestant.id, escape_quotes(&contestant.name));
        }
    )
}

pub fn list_contestants(cli: &Cli, store: &Store, competition: &str) -> Result<()> {
    let competition = resolve::competition(store, competition)?;
    let contestants = store.db().contestants_for(competition.id)?;

    output_by_format_result!(cli.format,
        json => print_json(&contestants),
        human => {
            for contestant in &contestants {
                println!("{:>4}  {}", contestant.id, contestant.name);
            }
        },
        records => {
            print_records_header(
                "contestants",
                &[
                    ("competition", &competition.id.to_string()),
                    ("count", &contestants.len().to_string()),
                ],
            );
            for contestant in &contestants {
                println!("N {} \"{}\"", contestant.id, escape_quotes(&contestant.name));
            }
        }
    )
}

/// Add a criterion, keeping the competition's weights within 100 points
pub fn add_criterion(cli: &Cli, store: &Store, args: &CriterionAddArgs) -> Result<()> {
    let competition = resolve::competition(store, &args.competition)?;
    let existing: f64 = store
        .db()
        .criteria_for(competition.id)?
        .iter()
        .map(|c| c.weight)
        .sum();
    if existing + args.weight > MAX_TOTAL + 1e-9 {
        return Err(TallyError::invalid_value(
            "criterion weight",
            format!(
                "{} would bring the total to {}% (limit {}%)",
                format_number(args.weight),
                format_number(existing + args.weight),
                format_number(MAX_TOTAL)
            ),
        ));
    }

    let criterion = store
        .db()
        .insert_criterion(competition.id, &args.name, args.max, args.weight)?;

    output_by_format_result!(cli.format,
        json => print_json(&criterion),
        human => {
            println!(
                "{}  {}  max {}",
                criterion.id,
                criterion.label(),
                format_number(criterion.max_score)
            );
        },
        records => {
            print_records_header("criterion", &[]);
            println!(
                "K {} max={} weight={} \"{}\"",
                criterion.id,
                format_number(criterion.max_score),
                format_number(criterion.weight),
                escape_quotes(&criterion.name)
            );
        }
    )
}

pub fn list_criteria(cli: &Cli, store: &Store, competition: &str) -> Result<()> {
    let competition = resolve::competition(store, competition)?;
    let criteria = store.db().criteria_for(competition.id)?;

    output_by_format_result!(cli.format,
        json => print_json(&criteria),
        human => {
            for criterion in &criteria {
                println!(
                    "{:>4}  {}  max {}",
                    criterion.id,
                    criterion.label(),
                    format_number(criterion.max_score)
                );
            }
        },
        records => {
            print_records_header(
                "criteria",
                &[
                    ("competition", &competition.id.to_string()),
                    ("count", &criteria.len().to_string()),
                ],
            );
            for criterion in &criteria {
                println!(
                    "K {} max={} weight={} \"{}\"",
                    criterion.id,
                    format_number(criterion.max_score),
                    format_number(criterion.weight),
                    escape_quotes(&criterion.name)
                );
            }
        }
    )
}
