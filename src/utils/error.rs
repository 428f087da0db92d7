use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Skill graph unavailable: {reason}")]
    GraphUnavailable { reason: String },

    #[error("Insufficient candidates: needed {needed}, qualifying {available}")]
    InsufficientCandidates { needed: usize, available: usize },

    #[error("Malformed input: {field}: {reason}")]
    MalformedInput { field: String, reason: String },

    #[error("Score vector length mismatch: expected {expected}, got {actual}")]
    VectorLengthMismatch { expected: usize, actual: usize },

    #[error("Configuration error: {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Data,
    System,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MatchError::ConfigValidationError { .. }
            | MatchError::InvalidConfigValueError { .. }
            | MatchError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MatchError::MalformedInput { .. } => ErrorCategory::Validation,
            MatchError::GraphUnavailable { .. } | MatchError::InsufficientCandidates { .. } => {
                ErrorCategory::Data
            }
            MatchError::IoError(_) | MatchError::SerializationError(_) | MatchError::CsvError(_) => {
                ErrorCategory::System
            }
            MatchError::VectorLengthMismatch { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Recoverable: the engine keeps working in degraded mode
            MatchError::GraphUnavailable { .. } => ErrorSeverity::Low,
            MatchError::InsufficientCandidates { .. } => ErrorSeverity::Medium,
            MatchError::MalformedInput { .. }
            | MatchError::ConfigValidationError { .. }
            | MatchError::InvalidConfigValueError { .. }
            | MatchError::MissingConfigError { .. }
            | MatchError::IoError(_)
            | MatchError::SerializationError(_)
            | MatchError::CsvError(_) => ErrorSeverity::High,
            MatchError::VectorLengthMismatch { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MatchError::GraphUnavailable { .. } => {
                "Check the skill graph file path and format; matching continues with exact skill names only".to_string()
            }
            MatchError::InsufficientCandidates { needed, .. } => format!(
                "Add candidates to the pool or lower min_participants (currently {})",
                needed
            ),
            MatchError::MalformedInput { field, .. } => {
                format!("Fix the field '{}' and resubmit the whole batch", field)
            }
            MatchError::VectorLengthMismatch { .. } => {
                "Internal invariant violated; please report this as a bug".to_string()
            }
            MatchError::ConfigValidationError { field, .. }
            | MatchError::InvalidConfigValueError { field, .. }
            | MatchError::MissingConfigError { field } => {
                format!("Review the configuration value for '{}'", field)
            }
            MatchError::IoError(_) => "Check file paths and permissions".to_string(),
            MatchError::SerializationError(_) => {
                "Check that the input file is valid JSON with the expected shape".to_string()
            }
            MatchError::CsvError(_) => {
                "Check the CSV file for missing columns or malformed rows".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Validation => format!("Input rejected: {}", self),
            ErrorCategory::Data => format!("Match could not be completed: {}", self),
            ErrorCategory::System => format!("System problem: {}", self),
            ErrorCategory::Internal => format!("Internal fault: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_unavailable_is_low_severity() {
        let err = MatchError::GraphUnavailable {
            reason: "missing file".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Data);
    }

    #[test]
    fn test_invariant_violation_is_critical() {
        let err = MatchError::VectorLengthMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_malformed_input_mentions_field() {
        let err = MatchError::MalformedInput {
            field: "candidates[0].email".to_string(),
            reason: "empty".to_string(),
        };
        assert!(err.to_string().contains("candidates[0].email"));
        assert!(err.recovery_suggestion().contains("candidates[0].email"));
    }
}
