//! Error taxonomy.
//!
//! Load-time errors (`DataUnavailable`, `SchemaMismatch`, `MalformedValue`)
//! are fatal at startup. `InvalidSelection` is recoverable: the binder keeps
//! the previously rendered chart. `UndefinedRate` is only produced when a
//! caller explicitly asks for the numeric value of an undefined rate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CovidError>;

#[derive(Debug, Error)]
pub enum CovidError {
    #[error("data unavailable: {path}: {reason}")]
    DataUnavailable { path: String, reason: String },

    #[error("schema mismatch: table '{table}' has no column '{column}'")]
    SchemaMismatch { table: String, column: String },

    #[error("malformed value in '{table}'.'{column}': '{value}'")]
    MalformedValue {
        table: String,
        column: String,
        value: String,
    },

    #[error("invalid selection for '{input}': {value:?}")]
    InvalidSelection { input: String, value: Option<String> },

    #[error("undefined rate: {what} has a zero denominator")]
    UndefinedRate { what: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl CovidError {
    /// Whether the error must abort startup rather than be reported and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CovidError::DataUnavailable { .. }
                | CovidError::SchemaMismatch { .. }
                | CovidError::MalformedValue { .. }
                | CovidError::Storage(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_errors_are_recoverable() {
        let err = CovidError::InvalidSelection {
            input: "user_choice_world".to_string(),
            value: Some("Bogus".to_string()),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("user_choice_world"));
    }

    #[test]
    fn load_errors_are_fatal() {
        let err = CovidError::SchemaMismatch {
            table: "day_wise".to_string(),
            column: "Date".to_string(),
        };
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "schema mismatch: table 'day_wise' has no column 'Date'"
        );
    }
}
