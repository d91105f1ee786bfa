//! Error types for turftap

use std::fmt;
use thiserror::Error;

/// Main error type for turftap
#[derive(Debug, Error)]
pub enum TurftapError {
    /// No authenticated identity was supplied
    #[error("Unauthorized: sign in required")]
    Unauthorized,

    /// Identity present but lacking rights for the action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Listing not found
    #[error("Listing not found: {0}")]
    ListingNotFound(String),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    /// Parent comment referenced by a reply not found
    #[error("Parent comment not found: {0}")]
    ParentCommentNotFound(String),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence failure
    #[error("Store error: {0}")]
    Store(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TurftapError>,
    },
}

impl TurftapError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TurftapError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Classify the error for callers that only care about the broad kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            TurftapError::Unauthorized => ErrorKind::Unauthorized,
            TurftapError::Forbidden(_) => ErrorKind::Forbidden,
            TurftapError::ListingNotFound(_)
            | TurftapError::CommentNotFound(_)
            | TurftapError::ParentCommentNotFound(_)
            | TurftapError::UserNotFound(_) => ErrorKind::NotFound,
            TurftapError::Validation(_) => ErrorKind::InvalidInput,
            TurftapError::Store(_)
            | TurftapError::Io(_)
            | TurftapError::Serde(_)
            | TurftapError::Toml(_)
            | TurftapError::Config(_) => ErrorKind::StoreFailure,
            TurftapError::WithContext { source, .. } => source.kind(),
        }
    }
}

impl From<toml::de::Error> for TurftapError {
    fn from(err: toml::de::Error) -> Self {
        TurftapError::Toml(err.to_string())
    }
}

/// Broad error classification surfaced to request handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    InvalidInput,
    StoreFailure,
}

impl ErrorKind {
    /// Conventional HTTP status for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidInput => 400,
            ErrorKind::StoreFailure => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not-found",
            ErrorKind::InvalidInput => "invalid-input",
            ErrorKind::StoreFailure => "store-failure",
        };
        f.write_str(name)
    }
}

/// Result type alias for turftap
pub type Result<T> = std::result::Result<T, TurftapError>;
