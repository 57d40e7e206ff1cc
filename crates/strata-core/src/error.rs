//! Error types for strata operations.
//!
//! Provides a structured error hierarchy with error codes and
//! suggestions for resolution. Version-related failures carry the
//! exact user-facing messages the editing UI surfaces verbatim.

use thiserror::Error;

/// Result type alias for strata operations.
pub type StrataResult<T> = Result<T, StrataError>;

/// Main error type for all strata operations.
#[derive(Error, Debug)]
pub enum StrataError {
    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Block not found.
    #[error("Block not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        block_id: Option<String>,
    },

    /// Revert was requested without a target version.
    #[error("Version parameter missing")]
    MissingVersion,

    /// A version number has no matching snapshot.
    #[error("Could not find version {version}")]
    VersionNotFound { version: u32 },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValMissingField,

    // Block (BLK_xxx)
    BlkNotFound,

    // Version (VER_xxx)
    VerMissingParameter,
    VerNotFound,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,

    // Parse (PARSE_xxx)
    ParseInvalidJson,
    ParseInvalidTimestamp,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValMissingField => "VAL_002",
            ErrorCode::BlkNotFound => "BLK_001",
            ErrorCode::VerMissingParameter => "VER_001",
            ErrorCode::VerNotFound => "VER_002",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::ParseInvalidTimestamp => "PARSE_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl StrataError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a validation error with suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a not found error.
    pub fn not_found(block_id: impl Into<String>) -> Self {
        let id = block_id.into();
        Self::NotFound {
            message: format!("Block with id '{}' not found", id),
            code: ErrorCode::BlkNotFound,
            block_id: Some(id),
        }
    }

    /// Create a version not found error.
    pub fn version_not_found(version: u32) -> Self {
        Self::VersionNotFound { version }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::MissingVersion => ErrorCode::VerMissingParameter,
            Self::VersionNotFound { .. } => ErrorCode::VerNotFound,
            Self::Database { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::NotFound { .. } => Some("Please check the block ID and ensure it exists"),
            Self::MissingVersion => Some("Please pass the version number to revert to"),
            Self::VersionNotFound { .. } => {
                Some("Please check the version number against the block's version history")
            }
            Self::Database { .. } => Some("Please check the block store database path"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StrataError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}
