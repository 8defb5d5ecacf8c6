//! Client-boundary normalization and the thrown-error policy.
//!
//! Two rules live here:
//!
//! - Internal-only tags (`IMPLICIT_RETURN`, `INTERNAL_LOGIC`,
//!   `OUTPUT_VALIDATION`) become `UNHANDLED` at the client boundary, and
//!   only there. Lifecycle hooks see the original value.
//! - Anything thrown by user code goes through the configured
//!   [`ThrownErrorTransform`]. A missing transform, a transform that
//!   returns `Err`, or a transform that panics all fall back to the default
//!   `UNHANDLED` value.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde_json::json;

use crate::config::ThrownErrorTransform;
use crate::error::ActionError;
use crate::provider::ActionLogger;

/// Message of the default `UNHANDLED` value.
pub const DEFAULT_SERVER_ERROR_MESSAGE: &str =
    "Something went wrong while executing the operation.";

/// The default `UNHANDLED` value, mentioning the action by name if it has one.
pub fn default_unhandled(name: Option<&str>) -> ActionError {
    match name {
        Some(name) => ActionError::unhandled(format!(
            "Something went wrong while executing the operation \"{name}\"."
        )),
        None => ActionError::unhandled(DEFAULT_SERVER_ERROR_MESSAGE),
    }
}

/// Maps an error to its client-facing form.
///
/// Internal-only tags are replaced by [`default_unhandled`]; every
/// other value is returned unchanged.
pub fn normalize(error: &ActionError, name: Option<&str>) -> ActionError {
    if error.is_internal() {
        default_unhandled(name)
    } else {
        error.clone()
    }
}

/// Converts a thrown error into an [`ActionError`] using `transform`.
pub(crate) fn resolve_thrown(
    error: &anyhow::Error,
    transform: Option<&ThrownErrorTransform>,
    logger: Option<&dyn ActionLogger>,
    name: Option<&str>,
) -> ActionError {
    let Some(transform) = transform else {
        tracing::debug!(error = %error, "action threw, no transform configured");
        if let Some(logger) = logger {
            logger.error(
                "Action threw an error",
                &json!({ "error": format!("{error:#}") }),
            );
        }
        return default_unhandled(name);
    };

    match catch_unwind(AssertUnwindSafe(|| transform(error))) {
        Ok(Ok(mapped)) => mapped,
        Ok(Err(secondary)) => {
            tracing::debug!(
                error = %error,
                transform_error = %secondary,
                "thrown-error transform failed"
            );
            if let Some(logger) = logger {
                logger.warn(
                    "Thrown-error transform failed, using the default server error",
                    &json!({
                        "error": format!("{error:#}"),
                        "transformError": format!("{secondary:#}"),
                    }),
                );
            }
            default_unhandled(name)
        }
        Err(payload) => {
            let panic = panic_message(payload.as_ref());
            tracing::debug!(error = %error, panic = %panic, "thrown-error transform panicked");
            if let Some(logger) = logger {
                logger.warn(
                    "Thrown-error transform panicked, using the default server error",
                    &json!({ "error": format!("{error:#}"), "panic": panic }),
                );
            }
            default_unhandled(name)
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

/// Turns a caught panic into a thrown error.
pub(crate) fn panic_to_error(context: &str, payload: &(dyn Any + Send)) -> anyhow::Error {
    anyhow::anyhow!("{context} panicked: {}", panic_message(payload))
}
