use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Helper macro for logging elapsed time at trace level.
///
/// Usage:
/// ```rust,ignore
/// let start = Instant::now();
/// // ... some work ...
/// trace_time!(start, "compute_results");
/// // Or with additional fields:
/// trace_time!(start, "compute_results", rows = rows.len());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $name:expr) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $name);
    };
    ($start:expr, $name:expr $(, $field:ident = $value:expr)*) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $($field = $value),*, $name);
    };
}

/// Initialize structured logging based on CLI arguments
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let level = match (verbose, log_level) {
        (true, None) => "tally=debug,tally_core=debug",
        (false, None) => "tally=warn,tally_core=warn",
        (_, Some(level)) => level,
    };

    init_with_level(level, log_json)
}

fn init_with_level(level: &str, log_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // TALLY_LOG overrides the CLI flags, as does RUST_LOG
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("TALLY_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(expand_level(level)));

    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_span_events(
                        tracing_subscriber::fmt::format::FmtSpan::NEW
                            | tracing_subscriber::fmt::format::FmtSpan::CLOSE,
                    ),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

/// A bare level such as `debug` applies to both tally crates
fn expand_level(level: &str) -> String {
    if level.contains('=') {
        level.to_string()
    } else {
        format!("tally={level},tally_core={level}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_bare_level() {
        assert_eq!(expand_level("debug"), "tally=debug,tally_core=debug");
    }

    #[test]
    fn test_expand_keeps_directives() {
        assert_eq!(expand_level("tally_core=trace"), "tally_core=trace");
    }
}
