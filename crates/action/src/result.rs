//! Client-facing result of an invocation.
//!
//! A [`FinalResult`] pairs the normalized outcome with the shape chosen when
//! the action was built. Serializing it produces one of:
//!
//! - API: `{ "success": true, "data": .., "id": .. }` /
//!   `{ "success": false, "error": .., "id": .. }`
//! - Functional: `{ "type": "ok", "value": .., "id": .. }` /
//!   `{ "type": "err", "error": .., "id": .. }`
//! - Stateful: the API shape plus an optional `values` field.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::ResultShape;
use crate::error::ActionError;
use crate::id::ActionId;

/// Success data or error value of one invocation.
pub type Outcome = Result<Value, ActionError>;

/// Result returned to the caller, always stamped with the action's id.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalResult {
    id: ActionId,
    shape: ResultShape,
    outcome: Outcome,
    values: Option<Value>,
}

impl FinalResult {
    pub(crate) fn new(
        id: ActionId,
        shape: ResultShape,
        outcome: Outcome,
        values: Option<Value>,
    ) -> Self {
        // `values` only exists in the stateful shape.
        let values = match shape {
            ResultShape::Stateful => values,
            ResultShape::Api | ResultShape::Functional => None,
        };
        Self {
            id,
            shape,
            outcome,
            values,
        }
    }

    /// Identity of the action that produced this result.
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// Wire shape.
    pub fn shape(&self) -> ResultShape {
        self.shape
    }

    /// Returns `true` on success.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Success data.
    pub fn data(&self) -> Option<&Value> {
        self.outcome.as_ref().ok()
    }

    /// Client-facing error value.
    pub fn error(&self) -> Option<&ActionError> {
        self.outcome.as_ref().err()
    }

    /// Echoed input, stateful shape only.
    pub fn values(&self) -> Option<&Value> {
        self.values.as_ref()
    }

    /// The outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Consumes the result, returning the outcome.
    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }

    /// Wire JSON for the configured shape.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        match (self.shape, &self.outcome) {
            (ResultShape::Functional, Ok(value)) => {
                map.insert("type".to_owned(), Value::String("ok".to_owned()));
                map.insert("value".to_owned(), value.clone());
            }
            (ResultShape::Functional, Err(error)) => {
                map.insert("type".to_owned(), Value::String("err".to_owned()));
                map.insert("error".to_owned(), error.to_json());
            }
            (ResultShape::Api | ResultShape::Stateful, Ok(data)) => {
                map.insert("success".to_owned(), Value::Bool(true));
                map.insert("data".to_owned(), data.clone());
            }
            (ResultShape::Api | ResultShape::Stateful, Err(error)) => {
                map.insert("success".to_owned(), Value::Bool(false));
                map.insert("error".to_owned(), error.to_json());
            }
        }
        if let Some(values) = &self.values {
            map.insert("values".to_owned(), values.clone());
        }
        map.insert("id".to_owned(), Value::String(self.id.to_string()));
        Value::Object(map)
    }
}

impl Serialize for FinalResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<FinalResult> for Value {
    fn from(result: FinalResult) -> Self {
        result.to_json()
    }
}

impl From<&FinalResult> for Value {
    fn from(result: &FinalResult) -> Self {
        result.to_json()
    }
}

/// Success data of a previous result in its wire form, if it succeeded.
///
/// Reads both the API/stateful (`success` + `data`) and the functional
/// (`type: "ok"` + `value`) shapes.
pub fn previous_data(previous: &Value) -> Option<&Value> {
    if previous.get("success").and_then(Value::as_bool) == Some(true) {
        return previous.get("data");
    }
    if previous.get("type").and_then(Value::as_str) == Some("ok") {
        return previous.get("value");
    }
    None
}
