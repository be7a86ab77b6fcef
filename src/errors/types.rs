//! # Error Types
//!
//! Error taxonomy for the staffdesk service using `thiserror`.
//!
//! Every failure carries a stable [`ErrorKind`]. Handlers map kinds to status codes
//! and tests assert on kinds, never on message text.

use std::fmt;

/// Custom result type for staffdesk operations
pub type Result<T> = std::result::Result<T, StaffdeskError>;

/// Stable failure classification exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthenticated,
    InvalidSession,
    Forbidden,
    InvalidInput,
    InvalidCredentials,
    Conflict,
    NotFound,
    PayloadTooLarge,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::InvalidSession => "invalid_session",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InvalidCredentials => "invalid_credentials",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::PayloadTooLarge => "payload_too_large",
            ErrorKind::Internal => "internal_error",
        }
    }

    /// HTTP status code for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Unauthenticated
            | ErrorKind::InvalidSession
            | ErrorKind::InvalidCredentials => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::InvalidInput => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::NotFound => 404,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the staffdesk service
#[derive(thiserror::Error, Debug)]
pub enum StaffdeskError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database and storage errors
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Malformed, missing or inconsistent request data
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// Authentication and authorization errors
    #[error("Authentication error: {message}")]
    Auth { message: String, error_type: AuthErrorType },

    /// Resource not found errors
    #[error("Resource not found: {resource_type} with ID '{id}'")]
    NotFound { resource_type: String, id: String },

    /// Uniqueness violations
    #[error("Resource conflict: {message}")]
    Conflict { message: String, resource_type: String },

    /// Upload exceeded the configured limit
    #[error("Payload too large: limit is {limit_bytes} bytes")]
    PayloadTooLarge { limit_bytes: u64 },

    /// Internal server errors
    #[error("Internal server error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Authentication error subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorType {
    MissingToken,
    MalformedToken,
    InvalidToken,
    ExpiredToken,
    InsufficientPermissions,
    InvalidCredentials,
}

impl fmt::Display for AuthErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthErrorType::MissingToken => write!(f, "missing_token"),
            AuthErrorType::MalformedToken => write!(f, "malformed_token"),
            AuthErrorType::InvalidToken => write!(f, "invalid_token"),
            AuthErrorType::ExpiredToken => write!(f, "expired_token"),
            AuthErrorType::InsufficientPermissions => write!(f, "insufficient_permissions"),
            AuthErrorType::InvalidCredentials => write!(f, "invalid_credentials"),
        }
    }
}

impl StaffdeskError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create an authentication error
    pub fn auth<S: Into<String>>(message: S, error_type: AuthErrorType) -> Self {
        Self::Auth { message: message.into(), error_type }
    }

    /// Caller is authenticated but its role may not perform the operation
    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::auth(message, AuthErrorType::InsufficientPermissions)
    }

    /// Create an internal server error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource_type: R, id: I) -> Self {
        Self::NotFound { resource_type: resource_type.into(), id: id.into() }
    }

    /// Create a conflict error
    pub fn conflict<M: Into<String>, R: Into<String>>(message: M, resource_type: R) -> Self {
        Self::Conflict { message: message.into(), resource_type: resource_type.into() }
    }

    pub fn payload_too_large(limit_bytes: u64) -> Self {
        Self::PayloadTooLarge { limit_bytes }
    }

    /// Stable classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StaffdeskError::Validation { .. } => ErrorKind::InvalidInput,
            StaffdeskError::Auth { error_type, .. } => match error_type {
                AuthErrorType::MissingToken | AuthErrorType::MalformedToken => {
                    ErrorKind::Unauthenticated
                }
                AuthErrorType::InvalidToken | AuthErrorType::ExpiredToken => {
                    ErrorKind::InvalidSession
                }
                AuthErrorType::InsufficientPermissions => ErrorKind::Forbidden,
                AuthErrorType::InvalidCredentials => ErrorKind::InvalidCredentials,
            },
            StaffdeskError::NotFound { .. } => ErrorKind::NotFound,
            StaffdeskError::Conflict { .. } => ErrorKind::Conflict,
            StaffdeskError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            StaffdeskError::Database { source, .. } if is_unique_violation(source) => {
                ErrorKind::Conflict
            }
            StaffdeskError::Config { .. }
            | StaffdeskError::Database { .. }
            | StaffdeskError::Io { .. }
            | StaffdeskError::Serialization { .. }
            | StaffdeskError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Get the HTTP status code that should be returned for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Add context to an error (used by storage code wrapping lower-level failures)
    pub(crate) fn add_context(&mut self, context: String) {
        match self {
            StaffdeskError::Io { context: ref mut ctx, .. }
            | StaffdeskError::Database { context: ref mut ctx, .. }
            | StaffdeskError::Serialization { context: ref mut ctx, .. } => {
                *ctx = format!("{}: {}", context, ctx);
            }
            _ => {}
        }
    }
}

/// Whether the store rejected a write because of a UNIQUE constraint.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    error.as_database_error().map(|db_err| db_err.is_unique_violation()).unwrap_or(false)
}

// Error conversions for common external error types
impl From<sqlx::Error> for StaffdeskError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database { source: error, context: "Database operation failed".to_string() }
    }
}

impl From<std::io::Error> for StaffdeskError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for StaffdeskError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<sqlx::migrate::MigrateError> for StaffdeskError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        Self::Internal {
            message: "Database migration failed".to_string(),
            source: Some(Box::new(error)),
        }
    }
}

impl From<validator::ValidationErrors> for StaffdeskError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        match fields.first() {
            Some((field, _)) => Self::validation_field(
                format!("Validation failed: {}", message),
                field.to_string(),
            ),
            None => Self::validation("Validation failed"),
        }
    }
}
