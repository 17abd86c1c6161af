//! Structured error handling with codes, context, and recovery suggestions
//!
//! Every failure surfaced by the loader carries:
//! - An error code for programmatic handling
//! - A human-readable message
//! - Optional context and a recovery suggestion
//! - A serializable report form for logging

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    // Descriptor errors (3xxx)
    DescriptorError = 3000,
    DescriptorNotFound = 3001,
    DescriptorParseError = 3002,
    MissingField = 3003,

    // Field validation errors (4xxx)
    ValidationError = 4000,
    InvalidIdentifier = 4001,
    InvalidVersion = 4002,
    InvalidCoordinate = 4003,
    IncompatibleLanguageLevels = 4004,

    // Plugin errors (5xxx)
    PluginError = 5000,
    PluginOrder = 5001,
    UnknownPlugin = 5002,

    // Credential errors (6xxx)
    CredentialError = 6000,
    MissingCredentialSource = 6001,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Descriptor",
            4 => "Validation",
            5 => "Plugin",
            6 => "Credential",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    pub fn descriptor(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DescriptorError, message)
    }

    pub fn descriptor_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::DescriptorNotFound,
            format!("Descriptor file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the descriptor path exists and you have read permissions")
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(ErrorCode::MissingField, format!("Missing required field: {}", field))
            .with_suggestion(format!("Add `{}` to the descriptor", field))
    }

    pub fn invalid_identifier(field: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::InvalidIdentifier,
            format!("Invalid identifier in `{}`: {:?}", field, value),
        )
        .with_suggestion(
            "Use a reverse-domain identifier: lowercase segments separated by dots, \
             e.g. `com.example.app`",
        )
    }

    pub fn invalid_version(field: &str, value: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidVersion,
            format!("Invalid version in `{}`: {}", field, value),
        )
    }

    pub fn plugin_order(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PluginOrder, message).with_suggestion(
            "Declare the packaging-framework plugin after the platform and \
             language-toolchain plugins",
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CredentialError, message)
    }
}

/// Serializable error report for logging and tooling output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(
            ErrorCode::DescriptorParseError,
            format!("TOML parse error: {}", err),
        )
        .with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(
            ErrorCode::DescriptorParseError,
            format!("JSON parse error: {}", err),
        )
        .with_source(err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::new(ErrorCode::Internal, format!("Regex error: {}", err)).with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}
