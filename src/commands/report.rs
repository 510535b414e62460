//! `tally report` - render ranked results to a PDF file

use std::fs;

use serde_json::json;
use tally_core::error::{Result, TallyError};
use tally_core::records::path_relative_to_cwd;
use tally_core::store::paths::report_file_name;

use super::dispatch::{trace_command, CommandContext};
use crate::cli::commands::ReportArgs;
use crate::cli::paths::resolve_against;
use crate::commands::format::{output_by_format_result, print_json_status, print_records_header};
use crate::commands::resolve;

pub fn execute(ctx: &CommandContext, args: &ReportArgs) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    let competition = resolve::competition(&store, &args.scope.competition)?;
    let event = resolve::event(&store, args.scope.event)?;
    let fields = store.criterion_fields(competition.id)?;
    let results = store.get_results(event.id, competition.id)?;

    let bytes = store.render_report(event.id, competition.id, &results, &fields)?;
    trace_command!(ctx.cli, ctx.start, "render_report");

    let path = match &args.output {
        Some(path) => resolve_against(ctx.root, path),
        None => ctx.root.join(report_file_name(&competition.slug, event.id)),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "report written");

    let shown = path_relative_to_cwd(&path);
    output_by_format_result!(ctx.cli.format,
        json => {
            print_json_status(
                "ok",
                None,
                &[
                    ("path", json!(path.display().to_string())),
                    ("bytes", json!(bytes.len())),
                    ("rows", json!(results.len())),
                ],
            )?;
            Ok::<(), TallyError>(())
        },
        human => {
            println!("Wrote {}", shown);
        },
        records => {
            print_records_header(
                "report",
                &[
                    ("event", &event.id.to_string()),
                    ("competition", &competition.id.to_string()),
                    ("status", "ok"),
                ],
            );
            println!("F {} bytes={}", shown, bytes.len());
        }
    )
}
