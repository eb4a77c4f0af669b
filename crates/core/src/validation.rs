//! Configuration and input validation
//!
//! # Example
//!
//! ```rust
//! use tglogin_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("bot.name", "my_login_bot")
//!     .max_length("bot.name", "my_login_bot", 32)
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use crate::error::{Error, ErrorCode, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Telegram bot usernames: 5 to 32 characters, ending in "bot".
static BOT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]{1,28}[Bb][Oo][Tt]$").expect("valid regex")
});

static CALLBACK_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^\s/?#]+[^\s]*$").expect("valid regex")
});

/// Validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
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

/// Validation result
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

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Convert to Result type
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
            Err(Error::new(
                ErrorCode::ConfigValidationError,
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

    fn fail(
        mut self,
        field: &str,
        code: &str,
        message: String,
        expected: Option<String>,
        actual: Option<String>,
    ) -> Self {
        self.result.add_error(ValidationError {
            field: field.to_string(),
            message,
            code: code.to_string(),
            expected,
            actual,
        });
        self
    }

    /// Validate that a field is not empty
    #[must_use]
    pub fn required(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            return self.fail(
                field,
                "REQUIRED",
                "Field is required".to_string(),
                Some("non-empty value".to_string()),
                Some("empty".to_string()),
            );
        }
        self
    }

    /// Validate maximum length
    #[must_use]
    pub fn max_length(self, field: &str, value: &str, max: usize) -> Self {
        if value.len() > max {
            return self.fail(
                field,
                "MAX_LENGTH",
                format!("Must be at most {max} characters"),
                Some(format!("<= {max} chars")),
                Some(format!("{} chars", value.len())),
            );
        }
        self
    }

    /// Validate against a compiled pattern
    #[must_use]
    pub fn matches(self, field: &str, value: &str, pattern: &Regex, description: &str) -> Self {
        if !pattern.is_match(value) {
            return self.fail(
                field,
                "PATTERN",
                format!("Must match {description}"),
                Some(description.to_string()),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Validate a numeric range
    #[must_use]
    pub fn range<T: PartialOrd + std::fmt::Display>(
        self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        if value < min || value > max {
            return self.fail(
                field,
                "RANGE",
                format!("Must be between {min} and {max}"),
                Some(format!("{min} - {max}")),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Add a warning (non-blocking)
    #[must_use]
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

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

/// Validate a bot username as shown on the login widget.
pub fn validate_bot_name(name: &str) -> ValidationResult {
    let name = name.strip_prefix('@').unwrap_or(name);
    Validator::new()
        .required("bot.name", name)
        .max_length("bot.name", name, 32)
        .matches("bot.name", name, &BOT_NAME, "a Telegram bot username ending in \"bot\"")
        .validate()
}

/// Validate the login callback URL.
pub fn validate_callback_url(url: &str) -> ValidationResult {
    let mut result = Validator::new()
        .matches("bot.callback_url", url, &CALLBACK_URL, "an http(s) URL")
        .validate();

    if url.starts_with("http://") {
        result.add_warning(ValidationError {
            field: "bot.callback_url".to_string(),
            message: "Callback URL is not HTTPS".to_string(),
            code: "INSECURE_URL".to_string(),
            expected: Some("https://".to_string()),
            actual: Some(url.to_string()),
        });
    }
    result
}
