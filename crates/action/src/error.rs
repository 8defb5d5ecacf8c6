//! Error values an action can produce and their wire form.

use std::fmt;

use craft_validator::{Issue, PathSegment};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Wire tag of every built-in error variant.
///
/// Internal-only tags never reach the client; see [`ErrorKind::is_internal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Stateful placeholder before the first execution.
    InitialState,
    /// Catch-all for thrown errors and hidden internal faults.
    Unhandled,
    /// The input adapter rejected the input.
    InputValidation,
    /// A bind-argument adapter rejected its argument.
    BindArgsValidation,
    /// The handler returned nothing.
    ImplicitReturn,
    /// The pipeline detected a contract violation.
    InternalLogic,
    /// The output adapter rejected the handler's data.
    OutputValidation,
}

impl ErrorKind {
    /// The tag as it appears in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialState => "INITIAL_STATE",
            Self::Unhandled => "UNHANDLED",
            Self::InputValidation => "INPUT_VALIDATION",
            Self::BindArgsValidation => "BIND_ARGS_VALIDATION",
            Self::ImplicitReturn => "IMPLICIT_RETURN",
            Self::InternalLogic => "INTERNAL_LOGIC",
            Self::OutputValidation => "OUTPUT_VALIDATION",
        }
    }

    /// Parses a wire tag back into a built-in kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "INITIAL_STATE" => Self::InitialState,
            "UNHANDLED" => Self::Unhandled,
            "INPUT_VALIDATION" => Self::InputValidation,
            "BIND_ARGS_VALIDATION" => Self::BindArgsValidation,
            "IMPLICIT_RETURN" => Self::ImplicitReturn,
            "INTERNAL_LOGIC" => Self::InternalLogic,
            "OUTPUT_VALIDATION" => Self::OutputValidation,
            _ => return None,
        })
    }

    /// Returns `true` for tags that must be replaced before leaving the action.
    pub fn is_internal(self) -> bool {
        matches!(
            self,
            Self::ImplicitReturn | Self::InternalLogic | Self::OutputValidation
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How validation issues are encoded in an error value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorFormat {
    /// `issues: [{path, message}, ...]`
    #[default]
    Flattened,
    /// `formErrors: [...]`, `fieldErrors: {field: [...]}`
    Nested,
}

/// Encoded validation failure carried by the `*_VALIDATION` variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrors {
    /// Every issue with its full path.
    Flattened {
        /// Summary message.
        message: String,
        /// Issues in adapter order.
        issues: Vec<Issue>,
    },
    /// Issues grouped by their first path segment.
    Nested {
        /// Summary message.
        message: String,
        /// Messages of issues with an empty path.
        form_errors: Vec<String>,
        /// Messages keyed by first path segment, in first-seen order.
        field_errors: IndexMap<String, Vec<String>>,
    },
}

impl ValidationErrors {
    /// Encodes `issues` in the requested format.
    pub fn from_issues(
        format: ValidationErrorFormat,
        message: impl Into<String>,
        issues: Vec<Issue>,
    ) -> Self {
        let message = message.into();
        match format {
            ValidationErrorFormat::Flattened => Self::Flattened { message, issues },
            ValidationErrorFormat::Nested => {
                let mut form_errors = Vec::new();
                let mut field_errors: IndexMap<String, Vec<String>> = IndexMap::new();
                for issue in issues {
                    match issue.first_segment().map(PathSegment::as_key) {
                        None => form_errors.push(issue.message),
                        Some(field) => field_errors.entry(field).or_default().push(issue.message),
                    }
                }
                Self::Nested {
                    message,
                    form_errors,
                    field_errors,
                }
            }
        }
    }

    /// Summary message.
    pub fn message(&self) -> &str {
        match self {
            Self::Flattened { message, .. } | Self::Nested { message, .. } => message,
        }
    }

    fn write_fields(&self, map: &mut Map<String, Value>) {
        map.insert("message".to_owned(), Value::String(self.message().to_owned()));
        match self {
            Self::Flattened { issues, .. } => {
                map.insert(
                    "issues".to_owned(),
                    Value::Array(issues.iter().map(Issue::to_json).collect()),
                );
            }
            Self::Nested {
                form_errors,
                field_errors,
                ..
            } => {
                map.insert("formErrors".to_owned(), strings(form_errors));
                let fields = field_errors
                    .iter()
                    .map(|(field, messages)| (field.clone(), strings(messages)))
                    .collect();
                map.insert("fieldErrors".to_owned(), Value::Object(fields));
            }
        }
    }
}

fn strings(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

/// Error declared by the action author and raised from its handler.
///
/// Serializes as `{ "type": kind, "message"?: ..., ...fields }`.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomError {
    kind: String,
    message: Option<String>,
    fields: Map<String, Value>,
}

impl CustomError {
    /// Creates an error tagged `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: None,
            fields: Map::new(),
        }
    }

    /// Sets the human message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds an extra field. `type` and `message` are reserved and ignored.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != "type" && key != "message" {
            self.fields.insert(key, value.into());
        }
        self
    }

    /// The `type` tag.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The human message, if one was set.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Extra fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl fmt::Display for CustomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.kind),
            None => f.write_str(&self.kind),
        }
    }
}

/// Every error value an action can produce.
///
/// Built-in tags are closed variants; author-declared errors live in
/// [`ActionError::Custom`] with an open field map. Use
/// [`normalize`](crate::normalize::normalize) to obtain the client-facing
/// form; the unnormalized value is what lifecycle hooks observe.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ActionError {
    /// Stateful placeholder before the first execution.
    #[error("{}", INITIAL_STATE_MESSAGE)]
    InitialState,

    /// Generic server error.
    #[error("{message}")]
    Unhandled {
        /// Message shown to the client.
        message: String,
    },

    /// The input adapter rejected the input.
    #[error("{}", .0.message())]
    InputValidation(ValidationErrors),

    /// A bind-argument adapter rejected its argument.
    #[error("{}", .0.message())]
    BindArgsValidation(ValidationErrors),

    /// The handler completed without a value.
    #[error("{message}")]
    ImplicitReturn {
        /// Diagnostic message.
        message: String,
    },

    /// The pipeline detected a contract violation.
    #[error("{message}")]
    InternalLogic {
        /// Diagnostic message.
        message: String,
    },

    /// The output adapter rejected the handler's data.
    #[error("{}", .0.message())]
    OutputValidation(ValidationErrors),

    /// Author-declared error.
    #[error("{0}")]
    Custom(CustomError),
}

pub(crate) const INITIAL_STATE_MESSAGE: &str = "Action has not been executed yet";

impl ActionError {
    /// Shorthand for [`ActionError::Unhandled`].
    pub fn unhandled(message: impl Into<String>) -> Self {
        Self::Unhandled {
            message: message.into(),
        }
    }

    /// Shorthand for [`ActionError::InternalLogic`].
    pub fn internal_logic(message: impl Into<String>) -> Self {
        Self::InternalLogic {
            message: message.into(),
        }
    }

    /// Built-in tag, `None` for custom errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        Some(match self {
            Self::InitialState => ErrorKind::InitialState,
            Self::Unhandled { .. } => ErrorKind::Unhandled,
            Self::InputValidation(_) => ErrorKind::InputValidation,
            Self::BindArgsValidation(_) => ErrorKind::BindArgsValidation,
            Self::ImplicitReturn { .. } => ErrorKind::ImplicitReturn,
            Self::InternalLogic { .. } => ErrorKind::InternalLogic,
            Self::OutputValidation(_) => ErrorKind::OutputValidation,
            Self::Custom(_) => return None,
        })
    }

    /// The `type` field as it appears on the wire.
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Custom(custom) => custom.kind(),
            other => other.kind().map_or("", ErrorKind::as_str),
        }
    }

    /// The `message` field, if the error carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::InitialState => Some(INITIAL_STATE_MESSAGE),
            Self::Unhandled { message }
            | Self::ImplicitReturn { message }
            | Self::InternalLogic { message } => Some(message),
            Self::InputValidation(errors)
            | Self::BindArgsValidation(errors)
            | Self::OutputValidation(errors) => Some(errors.message()),
            Self::Custom(custom) => custom.message(),
        }
    }

    /// Returns `true` if this value must not cross the client boundary.
    ///
    /// Decided by the wire tag, so a custom error carrying an internal-only
    /// tag is contained like the built-in variant.
    pub fn is_internal(&self) -> bool {
        ErrorKind::from_tag(self.type_tag()).is_some_and(ErrorKind::is_internal)
    }

    /// Validation payload of the `*_VALIDATION` variants.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::InputValidation(errors)
            | Self::BindArgsValidation(errors)
            | Self::OutputValidation(errors) => Some(errors),
            _ => None,
        }
    }

    /// JSON form: `{ "type": ..., "message": ..., ... }`.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_owned(), Value::String(self.type_tag().to_owned()));
        match self {
            Self::InitialState => {
                map.insert(
                    "message".to_owned(),
                    Value::String(INITIAL_STATE_MESSAGE.to_owned()),
                );
            }
            Self::Unhandled { message }
            | Self::ImplicitReturn { message }
            | Self::InternalLogic { message } => {
                map.insert("message".to_owned(), Value::String(message.clone()));
            }
            Self::InputValidation(errors)
            | Self::BindArgsValidation(errors)
            | Self::OutputValidation(errors) => errors.write_fields(&mut map),
            Self::Custom(custom) => {
                if let Some(message) = custom.message() {
                    map.insert("message".to_owned(), Value::String(message.to_owned()));
                }
                for (key, value) in custom.fields() {
                    map.insert(key.clone(), value.clone());
                }
            }
        }
        Value::Object(map)
    }
}

impl From<CustomError> for ActionError {
    fn from(error: CustomError) -> Self {
        Self::Custom(error)
    }
}

impl Serialize for ActionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn sample_issues() -> Vec<Issue> {
        vec![
            Issue::root("Passwords do not match"),
            Issue::at(["email"], "Invalid email address"),
            Issue::at([PathSegment::from("tags"), 0usize.into()], "Too short"),
            Issue::at(["email"], "Already registered"),
        ]
    }

    #[test]
    fn message_accessor() {
        assert_eq!(
            ActionError::InitialState.message(),
            Some("Action has not been executed yet")
        );
        assert_eq!(ActionError::unhandled("down").message(), Some("down"));
        assert_eq!(ActionError::Custom(CustomError::new("X")).message(), None);
    }

    #[test]
    fn internal_tags() {
        assert!(ActionError::internal_logic("x").is_internal());
        assert!(
            ActionError::ImplicitReturn {
                message: "x".into()
            }
            .is_internal()
        );
        assert!(!ActionError::unhandled("x").is_internal());
        assert!(!ActionError::InitialState.is_internal());
        assert!(!ActionError::Custom(CustomError::new("NOT_FOUND")).is_internal());
        assert!(!ActionError::Custom(CustomError::new("INPUT_VALIDATION")).is_internal());
    }

    #[rstest]
    #[case("IMPLICIT_RETURN")]
    #[case("INTERNAL_LOGIC")]
    #[case("OUTPUT_VALIDATION")]
    fn custom_errors_with_internal_tags_are_internal(#[case] tag: &str) {
        let error = ActionError::Custom(CustomError::new(tag).with_message("secret detail"));
        assert!(error.is_internal());
        assert_eq!(ErrorKind::from_tag(tag).map(ErrorKind::as_str), Some(tag));
    }

    #[test]
    fn flattened_encoding_keeps_every_issue() {
        let errors = ValidationErrors::from_issues(
            ValidationErrorFormat::Flattened,
            "Input validation failed",
            sample_issues(),
        );
        assert_eq!(
            ActionError::InputValidation(errors).to_json(),
            json!({
                "type": "INPUT_VALIDATION",
                "message": "Input validation failed",
                "issues": [
                    {"path": [], "message": "Passwords do not match"},
                    {"path": ["email"], "message": "Invalid email address"},
                    {"path": ["tags", 0], "message": "Too short"},
                    {"path": ["email"], "message": "Already registered"}
                ]
            })
        );
    }

    #[test]
    fn nested_encoding_groups_by_first_segment() {
        let errors = ValidationErrors::from_issues(
            ValidationErrorFormat::Nested,
            "Input validation failed",
            sample_issues(),
        );
        assert_eq!(
            ActionError::InputValidation(errors).to_json(),
            json!({
                "type": "INPUT_VALIDATION",
                "message": "Input validation failed",
                "formErrors": ["Passwords do not match"],
                "fieldErrors": {
                    "email": ["Invalid email address", "Already registered"],
                    "tags": ["Too short"]
                }
            })
        );
    }

    #[test]
    fn custom_error_serializes_open_fields() {
        let err: ActionError = CustomError::new("NOT_FOUND")
            .with_message("No such post")
            .with_field("postId", 42)
            .with_field("type", "ignored")
            .into();
        assert_eq!(err.type_tag(), "NOT_FOUND");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"type": "NOT_FOUND", "message": "No such post", "postId": 42})
        );
        assert_eq!(err.to_string(), "NOT_FOUND: No such post");
    }

    #[test]
    fn display_uses_message() {
        assert_eq!(ActionError::unhandled("boom").to_string(), "boom");
        assert_eq!(
            ActionError::InitialState.to_string(),
            "Action has not been executed yet"
        );
    }
}
