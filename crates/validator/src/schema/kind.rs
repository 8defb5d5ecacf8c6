use std::fmt;

use serde_json::Value;

use super::Schema;

/// The shape of value a [`Schema`] node accepts.
#[derive(Debug, Clone)]
pub enum Kind {
    /// Anything, including `null`.
    Any,
    /// JSON string.
    String,
    /// JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Number,
    /// JSON boolean.
    Boolean,
    /// JSON array of the inner schema.
    Array(Box<Schema>),
    /// JSON object with declared fields, in declaration order.
    Object(Vec<(String, Schema)>),
}

impl Kind {
    pub(super) fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::String => value.is_string(),
            Self::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|n| n.is_finite() && n.fract() == 0.0)
            }
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array(_) => value.is_array(),
            Self::Object(_) => value.is_object(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        })
    }
}

/// Name of a JSON value's type as it appears in mismatch messages.
pub(super) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
