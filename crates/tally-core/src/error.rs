//! Error types and exit codes for tally
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data/store error (missing store, unknown competition, etc.)
//! - 4: Scoring rejection (out of range, locked, incomplete, closed event, ...)

mod macros;

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{ContestantId, CriterionId, EventId, JudgeId};

/// Exit codes for the tally binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error (3)
    Data = 3,
    /// Score submission rejected by the ledger or lock coordinator (4)
    Rejected = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for TallyError {
    fn from(err: rusqlite::Error) -> Self {
        TallyError::Other(err.to_string())
    }
}

/// Errors that can occur during tally operations
#[derive(Error, Debug)]
pub enum TallyError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or records)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    // Data/store errors (exit code 3)
    #[error("store not found (searched from {search_root:?})")]
    StoreNotFound { search_root: PathBuf },

    #[error("invalid store: {reason}")]
    InvalidStore { reason: String },

    // Scoring rejections (exit code 4)
    #[error("score {value} for criterion {criterion} is out of range [0, {max}]")]
    OutOfRange {
        criterion: CriterionId,
        value: f64,
        max: f64,
    },

    #[error("scores for contestant {contestant} are locked and cannot be edited")]
    Locked { contestant: ContestantId },

    #[error(
        "cannot lock contestant {contestant}: {present} of {expected} judge x criterion scores submitted"
    )]
    IncompleteSubmission {
        contestant: ContestantId,
        present: i64,
        expected: i64,
    },

    #[error("judge {judge} already submitted scores for contestant {contestant}")]
    AlreadySubmitted {
        judge: JudgeId,
        contestant: ContestantId,
    },

    #[error("judge {judge} is not assigned to competition {competition}")]
    NotAssigned { judge: JudgeId, competition: String },

    #[error("event {event} is completed; its scores can no longer change")]
    EventClosed { event: EventId },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("{context} already exists: {value}")]
    AlreadyExists { context: String, value: String },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl TallyError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        TallyError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed transaction operation
    pub fn transaction(operation: &str, error: impl std::fmt::Display) -> Self {
        TallyError::FailedOperation {
            operation: format!("{} transaction", operation),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        TallyError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that already exists
    pub fn already_exists(context: &str, value: impl std::fmt::Display) -> Self {
        TallyError::AlreadyExists {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        TallyError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// True for the scoring rejections surfaced to judges and tabulators
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TallyError::OutOfRange { .. }
                | TallyError::Locked { .. }
                | TallyError::IncompleteSubmission { .. }
                | TallyError::AlreadySubmitted { .. }
                | TallyError::NotAssigned { .. }
                | TallyError::EventClosed { .. }
        )
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            TallyError::UnknownFormat(_)
            | TallyError::UsageError(_)
            | TallyError::InvalidValue { .. } => ExitCode::Usage,

            TallyError::StoreNotFound { .. }
            | TallyError::InvalidStore { .. }
            | TallyError::NotFound { .. }
            | TallyError::AlreadyExists { .. } => ExitCode::Data,

            TallyError::OutOfRange { .. }
            | TallyError::Locked { .. }
            | TallyError::IncompleteSubmission { .. }
            | TallyError::AlreadySubmitted { .. }
            | TallyError::NotAssigned { .. }
            | TallyError::EventClosed { .. } => ExitCode::Rejected,

            TallyError::Io(_)
            | TallyError::Json(_)
            | TallyError::Toml(_)
            | TallyError::FailedOperation { .. }
            | TallyError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            TallyError::UnknownFormat(_) => "unknown_format",
            TallyError::UsageError(_) => "usage_error",
            TallyError::StoreNotFound { .. } => "store_not_found",
            TallyError::InvalidStore { .. } => "invalid_store",
            TallyError::OutOfRange { .. } => "out_of_range",
            TallyError::Locked { .. } => "locked",
            TallyError::IncompleteSubmission { .. } => "incomplete_submission",
            TallyError::AlreadySubmitted { .. } => "already_submitted",
            TallyError::NotAssigned { .. } => "not_assigned",
            TallyError::EventClosed { .. } => "event_closed",
            TallyError::Io(_) => "io_error",
            TallyError::Json(_) => "json_error",
            TallyError::Toml(_) => "toml_error",
            TallyError::InvalidValue { .. } => "invalid_value",
            TallyError::AlreadyExists { .. } => "already_exists",
            TallyError::NotFound { .. } => "not_found",
            TallyError::FailedOperation { .. } => "failed_operation",
            TallyError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        match self {
            TallyError::IncompleteSubmission {
                contestant,
                present,
                expected,
            } => {
                error_obj["contestant"] = serde_json::json!(contestant.0);
                error_obj["present"] = serde_json::json!(present);
                error_obj["expected"] = serde_json::json!(expected);
            }
            TallyError::Locked { contestant } => {
                error_obj["contestant"] = serde_json::json!(contestant.0);
            }
            TallyError::EventClosed { event } => {
                error_obj["event"] = serde_json::json!(event.0);
            }
            TallyError::OutOfRange {
                criterion,
                value,
                max,
            } => {
                error_obj["criterion"] = serde_json::json!(criterion.0);
                error_obj["value"] = serde_json::json!(value);
                error_obj["max"] = serde_json::json!(max);
            }
            _ => {}
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for tally operations
pub type Result<T> = std::result::Result<T, TallyError>;
