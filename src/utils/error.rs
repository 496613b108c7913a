use serde::Serialize;
use thiserror::Error;

/// Raised by `Company::create` when a required field is blank.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct CompanyValidationError {
    pub field: &'static str,
    pub message: String,
}

impl CompanyValidationError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("{} is required", field),
        }
    }
}

/// A rejected dataset row, located by its zero-based position in the input.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("record {index}: {error}")]
pub struct InvalidRecord {
    pub index: usize,
    pub error: CompanyValidationError,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("semantic search failed: {message}")]
pub struct SemanticSearchError {
    pub message: String,
}

impl SemanticSearchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure of a whole match run. No partial matches accompany either variant.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum MatchError {
    #[error("Invalid match request: {message}")]
    InvalidRequest { message: String },

    #[error("Semantic search unavailable: {message}")]
    SemanticSearchUnavailable { message: String },
}

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Match run failed: {0}")]
    MatchError(#[from] MatchError),

    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unsupported dataset format: {path}")]
    UnsupportedFormatError { path: String },

    #[error("{dataset} dataset rejected: {} invalid record(s)", .errors.len())]
    DatasetValidationError {
        dataset: String,
        errors: Vec<InvalidRecord>,
    },
}

pub type Result<T> = std::result::Result<T, MatcherError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Matching,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MatcherError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MatcherError::ApiError(_) => ErrorCategory::Network,
            MatcherError::MatchError(MatchError::SemanticSearchUnavailable { .. }) => {
                ErrorCategory::Network
            }
            MatcherError::MatchError(MatchError::InvalidRequest { .. }) => ErrorCategory::Matching,
            MatcherError::ConfigError { .. }
            | MatcherError::ConfigValidationError { .. }
            | MatcherError::InvalidConfigValueError { .. }
            | MatcherError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MatcherError::CsvError(_)
            | MatcherError::SerializationError(_)
            | MatcherError::UnsupportedFormatError { .. }
            | MatcherError::DatasetValidationError { .. } => ErrorCategory::Input,
            MatcherError::IoError(_) | MatcherError::MetricsError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input | ErrorCategory::Matching => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MatcherError::ApiError(_)
            | MatcherError::MatchError(MatchError::SemanticSearchUnavailable { .. }) => {
                "Check that the semantic search endpoint is reachable, then rerun the match"
            }
            MatcherError::MatchError(MatchError::InvalidRequest { .. }) => {
                "Provide at least one source and one candidate company"
            }
            MatcherError::ConfigError { .. }
            | MatcherError::ConfigValidationError { .. }
            | MatcherError::InvalidConfigValueError { .. }
            | MatcherError::MissingConfigError { .. } => {
                "Review the matcher configuration file and command line flags"
            }
            MatcherError::UnsupportedFormatError { .. } => "Use a .json or .csv dataset file",
            MatcherError::DatasetValidationError { .. } => {
                "Every company needs a non-blank id, name and country"
            }
            MatcherError::CsvError(_) | MatcherError::SerializationError(_) => {
                "Check that the dataset file is well-formed"
            }
            MatcherError::IoError(_) => "Check file paths and permissions",
            MatcherError::MetricsError(_) => "Check that metric names are unique and valid",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MatcherError::DatasetValidationError { dataset, errors } => {
                let details: Vec<String> = errors
                    .iter()
                    .map(|r| format!("record {}: {} ({})", r.index, r.error.message, r.error.field))
                    .collect();
                format!("{} dataset is invalid: {}", dataset, details.join("; "))
            }
            MatcherError::MatchError(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}
