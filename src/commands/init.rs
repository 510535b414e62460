//! `tally init` command - create a new store
//!
//! Idempotent: an existing config and ledger are kept.

use std::path::Path;

use serde_json::json;
use tally_core::error::{Result, TallyError};
use tally_core::store::Store;

use crate::cli::paths::resolve_against;
use crate::cli::Cli;
use crate::commands::format::{output_by_format_result, print_json_status, print_records_header};

/// Execute the init command
pub fn execute(cli: &Cli, root: &Path) -> Result<()> {
    let store = match cli.store.as_ref() {
        Some(path) => Store::init_at(&resolve_against(root, path))?,
        None => Store::init(root)?,
    };
    let event = store.active_event()?;

    output_by_format_result!(cli.format,
        json => {
            print_json_status(
                "ok",
                Some("Store initialized"),
                &[
                    ("store", json!(store.root().display().to_string())),
                    ("event", json!(event)),
                ],
            )?;
            Ok::<(), TallyError>(())
        },
        human => {
            println!("Initialized tally store at {}", store.root().display());
            if !cli.quiet {
                println!("Active event: {} ({})", event.name, event.id);
            }
        },
        records => {
            print_records_header(
                "init",
                &[
                    ("store", &store.root().display().to_string()),
                    ("event", &event.id.to_string()),
                    ("status", "ok"),
                ],
            );
        }
    )
}
