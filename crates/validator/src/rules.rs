//! Single-value rules used by [`Schema`](crate::Schema).
//!
//! A rule inspects one JSON value and either accepts it or returns a
//! [`ValidationError`]. Rules do not check the value's type: the schema
//! has already done that before any rule runs, so a rule that receives a
//! value of the wrong shape simply accepts it.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// A rejected value: machine-readable code plus a human message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error code, e.g. `"min_length"`.
    pub code: Cow<'static, str>,
    /// Message shown to the client.
    pub message: Cow<'static, str>,
}

impl ValidationError {
    /// Creates an error with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A check on a single JSON value.
pub trait Validate: Send + Sync {
    /// Accepts or rejects `value`.
    fn validate(&self, value: &Value) -> Result<(), ValidationError>;
}

impl<F> Validate for F
where
    F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self(value)
    }
}

// ============================================================================
// STRING
// ============================================================================

/// String has at least `min` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLength {
    min: usize,
}

impl Validate for MinLength {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match value.as_str() {
            Some(s) if s.chars().count() < self.min => Err(ValidationError::new(
                "min_length",
                format!("String must contain at least {} character(s)", self.min),
            )),
            _ => Ok(()),
        }
    }
}

/// String has at most `max` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLength {
    max: usize,
}

impl Validate for MaxLength {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match value.as_str() {
            Some(s) if s.chars().count() > self.max => Err(ValidationError::new(
                "max_length",
                format!("String must contain at most {} character(s)", self.max),
            )),
            _ => Ok(()),
        }
    }
}

/// String is not empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotEmpty;

impl Validate for NotEmpty {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match value.as_str() {
            Some("") => Err(ValidationError::new("not_empty", "String must not be empty")),
            _ => Ok(()),
        }
    }
}

/// String matches a regular expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    code: &'static str,
    message: Cow<'static, str>,
}

impl Validate for Pattern {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match value.as_str() {
            Some(s) if !self.regex.is_match(s) => {
                Err(ValidationError::new(self.code, self.message.clone()))
            }
            _ => Ok(()),
        }
    }
}

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// String looks like an email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Email;

impl Validate for Email {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match value.as_str() {
            Some(s) if !EMAIL_REGEX.is_match(s) => {
                Err(ValidationError::new("email", "Invalid email address"))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// NUMERIC
// ============================================================================

/// Number is at least `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Min {
    min: f64,
}

impl Validate for Min {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match value.as_f64() {
            Some(n) if n < self.min => Err(ValidationError::new(
                "min",
                format!("Number must be greater than or equal to {}", self.min),
            )),
            _ => Ok(()),
        }
    }
}

/// Number is at most `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Max {
    max: f64,
}

impl Validate for Max {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match value.as_f64() {
            Some(n) if n > self.max => Err(ValidationError::new(
                "max",
                format!("Number must be less than or equal to {}", self.max),
            )),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// ARRAY
// ============================================================================

/// Array has at least `min` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinItems {
    min: usize,
}

impl Validate for MinItems {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match value.as_array() {
            Some(items) if items.len() < self.min => Err(ValidationError::new(
                "min_items",
                format!("Array must contain at least {} element(s)", self.min),
            )),
            _ => Ok(()),
        }
    }
}

/// Array has at most `max` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxItems {
    max: usize,
}

impl Validate for MaxItems {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match value.as_array() {
            Some(items) if items.len() > self.max => Err(ValidationError::new(
                "max_items",
                format!("Array must contain at most {} element(s)", self.max),
            )),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// FACTORIES
// ============================================================================

/// See [`MinLength`].
#[must_use]
pub fn min_length(min: usize) -> MinLength {
    MinLength { min }
}

/// See [`MaxLength`].
#[must_use]
pub fn max_length(max: usize) -> MaxLength {
    MaxLength { max }
}

/// See [`NotEmpty`].
#[must_use]
pub fn not_empty() -> NotEmpty {
    NotEmpty
}

/// See [`Email`].
#[must_use]
pub fn email() -> Email {
    Email
}

/// See [`Min`].
#[must_use]
pub fn min(min: f64) -> Min {
    Min { min }
}

/// See [`Max`].
#[must_use]
pub fn max(max: f64) -> Max {
    Max { max }
}

/// See [`MinItems`].
#[must_use]
pub fn min_items(min: usize) -> MinItems {
    MinItems { min }
}

/// See [`MaxItems`].
#[must_use]
pub fn max_items(max: usize) -> MaxItems {
    MaxItems { max }
}

/// Builds a [`Pattern`] rule.
///
/// # Errors
///
/// Returns the regex compile error for an invalid pattern.
pub fn pattern(
    regex: &str,
    message: impl Into<Cow<'static, str>>,
) -> Result<Pattern, regex::Error> {
    Ok(Pattern {
        regex: Regex::new(regex)?,
        code: "pattern",
        message: message.into(),
    })
}
