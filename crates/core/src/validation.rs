//! Descriptor field validation
//!
//! A fluent builder that collects hard errors and non-fatal warnings over the
//! fields of a descriptor, then folds into a single `Result`.
//!
//! # Example
//!
//! ```rust,ignore
//! use droidbuild_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .pattern("namespace", &config.namespace, &ID_GRAMMAR, "a reverse-domain identifier")
//!     .warn_if("applicationId", config.namespace != config.application_id, "ids differ")
//!     .validate();
//!
//! if !result.is_valid() {
//!     for error in result.errors() {
//!         eprintln!("Validation error: {}", error);
//!     }
//! }
//! ```

use crate::error::{Error, ErrorCode, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single validation finding, fatal or advisory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Short machine-readable code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Accumulated validation outcome
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Fold into a `Result`, joining all error messages
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            Err(Error::new(
                ErrorCode::ValidationError,
                format!("Validation failed: {}", messages.join("; ")),
            ))
        }
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate against a regex pattern
    pub fn pattern(mut self, field: &str, value: &str, re: &Regex, description: &str) -> Self {
        if !re.is_match(value) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must match {}", description),
                code: "PATTERN".to_string(),
                expected: Some(description.to_string()),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Validate that a path exists on disk
    pub fn path_exists(mut self, field: &str, path: &Path) -> Self {
        if !path.exists() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Path does not exist: {}", path.display()),
                code: "PATH_NOT_FOUND".to_string(),
                expected: Some("existing path".to_string()),
                actual: Some(path.display().to_string()),
            });
        }
        self
    }

    /// Add a warning when a condition holds (non-blocking)
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return the accumulated result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}
