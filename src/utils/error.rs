use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Source {url} returned status {status}")]
    SourceStatus { url: String, status: u16 },

    #[error("No book data found")]
    EmptyInput,

    #[error("Storage error: {0}")]
    StorageError(#[from] sqlx::Error),

    #[error("Invalid CSS selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Input,
    Storage,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::HttpError(_) | EtlError::SourceStatus { .. } => ErrorCategory::Source,
            EtlError::EmptyInput => ErrorCategory::Input,
            EtlError::StorageError(_) => ErrorCategory::Storage,
            EtlError::SelectorError { .. }
            | EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Source => ErrorSeverity::Low,
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Whether re-invoking the failed stage can change the outcome.
    ///
    /// An empty handoff stays empty on retry, and bad configuration stays bad.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Source | ErrorCategory::Storage | ErrorCategory::System
        )
    }

    /// Process exit code for the binaries: 2 for source and storage failures
    /// (retry later), 1 for input and configuration, 3 for system errors.
    /// A failed run never exits 0.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::HttpError(_) | EtlError::SourceStatus { .. } => {
                "Check that the catalogue URL is reachable from this host"
            }
            EtlError::EmptyInput => {
                "The catalogue page yielded no books; check the source URL and the extract selectors"
            }
            EtlError::StorageError(_) => {
                "Check DATABASE_URL and that the database server accepts connections"
            }
            EtlError::SelectorError { .. } => "Fix the selector in [extract.selectors]",
            EtlError::MissingConfigError { .. } => {
                "Export the referenced environment variable or write the value into the file"
            }
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Review the command-line flags or configuration file"
            }
            EtlError::IoError(_) => "Check file permissions and available disk space",
            EtlError::SerializationError(_) => "Report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::EmptyInput => {
                "No books were extracted, so nothing was loaded".to_string()
            }
            EtlError::StorageError(_) => format!("Could not write to the database: {}", self),
            EtlError::HttpError(_) | EtlError::SourceStatus { .. } => {
                format!("Could not fetch the catalogue page: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
