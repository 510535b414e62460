//! Value parsers for CLI arguments

use tally_core::format::OutputFormat;

/// One `CRITERION=VALUE` pair from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreArg {
    /// Criterion id or name
    pub criterion: String,
    pub value: f64,
}

/// Parse output format from string
pub fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Parse a `CRITERION=VALUE` score pair
pub fn parse_score(s: &str) -> std::result::Result<ScoreArg, String> {
    let (criterion, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected CRITERION=VALUE, got '{}'", s))?;

    let criterion = criterion.trim();
    if criterion.is_empty() {
        return Err(format!("missing criterion in '{}'", s));
    }

    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid score value '{}'", value.trim()))?;

    Ok(ScoreArg {
        criterion: criterion.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score() {
        let score = parse_score("Stage Presence=7.5").unwrap();
        assert_eq!(score.criterion, "Stage Presence");
        assert_eq!(score.value, 7.5);

        let score = parse_score("3 = 10").unwrap();
        assert_eq!(score.criterion, "3");
        assert_eq!(score.value, 10.0);
    }

    #[test]
    fn test_parse_score_rejects_malformed() {
        assert!(parse_score("7.5").is_err());
        assert!(parse_score("=7.5").is_err());
        assert!(parse_score("Pitch=high").is_err());
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("records").unwrap(), OutputFormat::Records);
        assert!(parse_format("yaml").is_err());
    }
}
