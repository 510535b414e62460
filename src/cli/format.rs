//! Format output dispatch helpers

/// Dispatch output by format when the json branch returns a `Result` and the
/// human and records branches only print.
///
/// ```rust,ignore
/// output_by_format_result!(cli.format,
///     json => { print_json(&rows) },
///     human => { println!("{} rows", rows.len()); },
///     records => { println!("H tally=1 records=1 mode=results"); }
/// )?;
/// ```
#[macro_export]
macro_rules! output_by_format_result {
    ($format:expr, json => $json:expr, human => $human:block, records => $records:block) => {
        match $format {
            $crate::cli::OutputFormat::Json => $json,
            $crate::cli::OutputFormat::Human => {
                $human;
                Ok(())
            }
            $crate::cli::OutputFormat::Records => {
                $records;
                Ok(())
            }
        }
    };
}
