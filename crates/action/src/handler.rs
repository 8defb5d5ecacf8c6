//! The business-logic function of an action.
//!
//! A handler receives a [`HandlerContext`] and either returns a
//! [`HandlerOutput`] or fails with an `anyhow::Error`. Failing (or
//! panicking) is the thrown-error path: the error goes through the
//! configured transform, never straight to the client.

use std::future::Future;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::context::HandlerContext;
use crate::error::ActionError;
use crate::id::ActionId;

/// What a handler produced.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    /// Completed without a value; reported internally as `IMPLICIT_RETURN`.
    Nothing,
    /// Success data.
    Ok(Value),
    /// Failure value. Any `id` set here is discarded: results always carry
    /// the action's own identity.
    Err {
        /// The error value.
        error: ActionError,
        /// Identity the handler claimed, ignored.
        id: Option<ActionId>,
    },
}

impl HandlerOutput {
    /// Success with JSON data.
    pub fn ok(data: impl Into<Value>) -> Self {
        Self::Ok(data.into())
    }

    /// Success with any serializable data.
    ///
    /// # Errors
    ///
    /// Returns the serde error if `data` cannot be represented as JSON.
    pub fn json<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(data).map(Self::Ok)
    }

    /// Failure with an error value.
    pub fn failure(error: impl Into<ActionError>) -> Self {
        Self::Err {
            error: error.into(),
            id: None,
        }
    }

    /// Interprets a JSON return value.
    ///
    /// `{"type": "ok", "value": ..}` and `{"type": "err", "error": ..}` are
    /// tagged results (an `id` inside them is ignored); anything else is
    /// plain success data.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::Ok(value);
        };
        let tag = map.get("type").and_then(Value::as_str).map(str::to_owned);
        match tag.as_deref() {
            Some("ok") if map.contains_key("value") => {
                Self::Ok(map.remove("value").unwrap_or(Value::Null))
            }
            Some("err") if map.contains_key("error") => {
                let id = map
                    .get("id")
                    .and_then(Value::as_str)
                    .and_then(|s| ActionId::parse(s).ok());
                let error = map.remove("error").unwrap_or(Value::Null);
                Self::Err {
                    error: error_from_json(error),
                    id,
                }
            }
            _ => Self::Ok(Value::Object(map)),
        }
    }
}

impl From<Value> for HandlerOutput {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

impl From<Option<Value>> for HandlerOutput {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Nothing, Self::from_json)
    }
}

impl From<()> for HandlerOutput {
    fn from((): ()) -> Self {
        Self::Nothing
    }
}

/// Reads an error value written by hand as JSON into a custom error.
fn error_from_json(error: Value) -> ActionError {
    let mut custom = crate::error::CustomError::new(
        error
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("UNKNOWN"),
    );
    if let Some(message) = error.get("message").and_then(Value::as_str) {
        custom = custom.with_message(message);
    }
    if let Value::Object(map) = error {
        for (key, value) in map {
            custom = custom.with_field(key, value);
        }
    }
    ActionError::Custom(custom)
}

/// Business logic of an action.
///
/// Implemented automatically for async closures taking a
/// [`HandlerContext`]; implement it on a struct when the handler carries
/// its own dependencies.
#[async_trait]
pub trait ActionHandler: Send + Sync + 'static {
    /// Runs the handler.
    async fn handle(&self, ctx: HandlerContext) -> anyhow::Result<HandlerOutput>;
}

#[async_trait]
impl<F, Fut> ActionHandler for F
where
    F: Fn(HandlerContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<HandlerOutput>> + Send + 'static,
{
    async fn handle(&self, ctx: HandlerContext) -> anyhow::Result<HandlerOutput> {
        self(ctx).await
    }
}
