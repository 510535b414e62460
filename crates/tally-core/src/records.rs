//! Utilities for records output format

use std::path::Path;

/// Escape double quotes so a value can sit inside a quoted field
pub fn escape_quotes(s: &str) -> String {
    s.replace('"', r#"\""#)
}

/// Convert an absolute path to a path relative to the current working directory
pub fn path_relative_to_cwd(path: &Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        path.strip_prefix(&cwd)
            .ok()
            .map(|p| {
                let s = p.display().to_string();
                if s.is_empty() {
                    ".".to_string()
                } else {
                    s
                }
            })
            .unwrap_or_else(|| path.display().to_string())
    } else {
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_quotes(r#"The "Voice""#), r#"The \"Voice\""#);
        assert_eq!(escape_quotes("plain"), "plain");
    }

    #[test]
    fn test_path_outside_cwd_stays_absolute() {
        let path = Path::new("/definitely/not/under/cwd/results.pdf");
        assert_eq!(path_relative_to_cwd(path), path.display().to_string());
    }
}
