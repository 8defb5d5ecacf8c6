use serde::Serialize;
use serde_json::Value;

use crate::id::ActionId;

/// Per-invocation record handed to the handler and every lifecycle hook.
///
/// Raw fields hold what the caller sent (form input already flattened).
/// Parsed fields are filled as validation stages succeed, so a hook that
/// observes a validation failure sees `None` for the stage that failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackMetadata {
    /// Identity of the action.
    pub action_id: ActionId,
    /// Declared name, if any.
    pub action_name: Option<String>,
    /// Main input as received.
    pub raw_input: Option<Value>,
    /// Bind arguments as received.
    pub raw_bind_args: Vec<Value>,
    /// Main input after the input adapter.
    pub parsed_input: Option<Value>,
    /// Bind arguments after their adapters.
    pub parsed_bind_args: Option<Vec<Value>>,
    /// Previous result, stateful mode only.
    pub prev_result: Option<Value>,
}

impl CallbackMetadata {
    /// Fresh record for one invocation.
    pub fn new(action_id: ActionId, action_name: Option<String>) -> Self {
        Self {
            action_id,
            action_name,
            raw_input: None,
            raw_bind_args: Vec::new(),
            parsed_input: None,
            parsed_bind_args: None,
            prev_result: None,
        }
    }
}
