use std::path::{Path, PathBuf};

use crate::error::{Result, TallyError};

/// Default store directory name (hidden)
pub const DEFAULT_STORE_DIR: &str = ".tally";

/// Configuration filename
pub const CONFIG_FILE: &str = "config.toml";

/// Find the nearest `.tally/` directory at or above `root`
pub fn discover_store(root: &Path) -> Result<PathBuf> {
    let mut current = root.to_path_buf();

    loop {
        let store_path = current.join(DEFAULT_STORE_DIR);
        if store_path.is_dir() {
            return Ok(store_path);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(TallyError::StoreNotFound {
                    search_root: root.to_path_buf(),
                });
            }
        }
    }
}

/// File name the CLI writes a report to
pub fn report_file_name(competition_slug: &str, event: crate::model::EventId) -> String {
    format!("results_{competition_slug}_{event}.pdf")
}
