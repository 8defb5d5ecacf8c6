//! Dependency-injection port traits for actions.
//!
//! The executor reports hook failures and thrown-error fallbacks through an
//! [`ActionLogger`] so embedding applications can route them wherever they
//! like. [`TracingLogger`] forwards to `tracing`; an action configured with
//! no logger stays silent.

use std::sync::Arc;

use serde_json::Value;

/// Port trait for action-level diagnostics.
pub trait ActionLogger: Send + Sync {
    /// Report an error with structured detail.
    fn error(&self, message: &str, detail: &Value);
    /// Report a warning with structured detail.
    fn warn(&self, message: &str, detail: &Value);
}

impl<L: ActionLogger + ?Sized> ActionLogger for Arc<L> {
    fn error(&self, message: &str, detail: &Value) {
        (**self).error(message, detail);
    }

    fn warn(&self, message: &str, detail: &Value) {
        (**self).warn(message, detail);
    }
}

/// [`ActionLogger`] that emits `tracing` events under the `craft_action` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ActionLogger for TracingLogger {
    fn error(&self, message: &str, detail: &Value) {
        tracing::error!(target: "craft_action", %detail, "{message}");
    }

    fn warn(&self, message: &str, detail: &Value) {
        tracing::warn!(target: "craft_action", %detail, "{message}");
    }
}

/// [`ActionLogger`] that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl ActionLogger for NoopLogger {
    fn error(&self, _message: &str, _detail: &Value) {}

    fn warn(&self, _message: &str, _detail: &Value) {}
}
