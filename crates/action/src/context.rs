//! What a handler sees while it runs.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::catalog::ErrorCatalog;
use crate::handler::HandlerOutput;
use crate::metadata::CallbackMetadata;
use crate::result::previous_data;

/// Everything a handler receives for one invocation.
///
/// Owned so handler futures can be `'static`; cloning is cheap apart from
/// the JSON payloads.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    input: Value,
    bind_args: Vec<Value>,
    errors: Arc<ErrorCatalog>,
    metadata: CallbackMetadata,
    prev_result: Option<Value>,
}

impl HandlerContext {
    pub(crate) fn new(
        input: Value,
        bind_args: Vec<Value>,
        errors: Arc<ErrorCatalog>,
        metadata: CallbackMetadata,
        prev_result: Option<Value>,
    ) -> Self {
        Self {
            input,
            bind_args,
            errors,
            metadata,
            prev_result,
        }
    }

    /// Validated input (`null` when none was sent and no adapter is declared).
    pub fn input(&self) -> &Value {
        &self.input
    }

    /// Deserializes the validated input into `T`.
    ///
    /// # Errors
    ///
    /// Returns the serde error; propagating it with `?` from the handler
    /// takes the thrown-error path.
    pub fn input_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.input.clone())
    }

    /// Validated bind arguments, in declaration order.
    pub fn bind_args(&self) -> &[Value] {
        &self.bind_args
    }

    /// Declared error constructors.
    pub fn errors(&self) -> &ErrorCatalog {
        &self.errors
    }

    /// Shorthand for returning the declared error `name`.
    pub fn fail(&self, name: &str, args: Value) -> HandlerOutput {
        HandlerOutput::failure(self.errors.raise(name, args))
    }

    /// Invocation metadata.
    pub fn metadata(&self) -> &CallbackMetadata {
        &self.metadata
    }

    /// Previous result in wire form (stateful mode).
    pub fn prev_result(&self) -> Option<&Value> {
        self.prev_result.as_ref()
    }

    /// Success data of the previous result, if it succeeded.
    pub fn prev_data(&self) -> Option<&Value> {
        self.prev_result.as_ref().and_then(previous_data)
    }
}
