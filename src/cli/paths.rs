//! Path resolution helpers shared by commands

use std::env;
use std::path::{Path, PathBuf};

/// Resolve the root path for store discovery.
///
/// Falls back to the current working directory, or "." if that cannot be
/// determined.
pub fn resolve_root_path(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Resolve an explicit `--store` or `--output` path against the root
pub fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
