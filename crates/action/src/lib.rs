//! # Craft Action
//!
//! Declare a unit of server-side logic once, call it many times, and always
//! get back a uniformly shaped, identity-stamped result.
//!
//! An action is declared through an [`ActionClient`]: optional input,
//! output and bind-argument [validation adapters](craft_validator::ValidationAdapter),
//! named error constructors, lifecycle hooks and finally a handler. The
//! resulting [`CraftedAction`] runs every call through the same pipeline:
//! validation, handler, output validation, error normalization, hooks and
//! result formatting.
//!
//! ## Core Types
//!
//! - [`CraftedAction`]: the callable, cheap to clone, stable [`ActionId`]
//! - [`ActionClient`] / [`ActionBuilder`]: declaration surface
//! - [`HandlerContext`] / [`HandlerOutput`]: what a handler sees and returns
//! - [`ActionError`]: closed built-in tags plus author-declared [`CustomError`]s
//! - [`FinalResult`]: API, functional or stateful wire shape
//! - [`LifecycleHooks`] / [`Hooks`]: isolated observers of each invocation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use craft_action::prelude::*;
//! use craft_validator::Schema;
//! use serde_json::json;
//!
//! let shout = ActionClient::new()
//!     .action()
//!     .name("shout")
//!     .input(Schema::string().non_empty())
//!     .handler(|ctx| async move {
//!         let text: String = ctx.input_as()?;
//!         Ok(HandlerOutput::ok(text.to_uppercase()))
//!     });
//!
//! let result = shout.call(json!("hi")).await;
//! assert_eq!(result.data(), Some(&json!("HI")));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// The callable action and its entry points.
pub mod action;
/// Declaration surface.
pub mod builder;
/// Named error constructors.
pub mod catalog;
/// Serializable options and the full action configuration.
pub mod config;
/// Context handed to handlers.
pub mod context;
/// Error taxonomy and validation-error encodings.
pub mod error;
mod executor;
/// Handler trait and return values.
pub mod handler;
/// Lifecycle hooks.
pub mod hooks;
/// Action identity.
pub mod id;
/// Raw call arguments and form flattening.
pub mod input;
/// Per-invocation metadata.
pub mod metadata;
/// Client-boundary normalization and the thrown-error policy.
pub mod normalize;
/// Convenience re-exports for action authors.
pub mod prelude;
/// Logger port.
pub mod provider;
/// Client-facing results.
pub mod result;
mod spec;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use action::CraftedAction;
pub use builder::{ActionBuilder, ActionClient};
pub use catalog::ErrorCatalog;
pub use config::{ActionConfig, ActionOptions, ResultFormat, ResultShape, ThrownErrorTransform};
pub use context::HandlerContext;
pub use error::{ActionError, CustomError, ErrorKind, ValidationErrorFormat, ValidationErrors};
pub use handler::{ActionHandler, HandlerOutput};
pub use hooks::{ErrorEvent, Hooks, LifecycleHooks, SettledEvent, StartEvent, SuccessEvent};
pub use id::ActionId;
pub use input::{FileEntry, FormData, FormValue, RawArg};
pub use metadata::CallbackMetadata;
pub use normalize::{DEFAULT_SERVER_ERROR_MESSAGE, default_unhandled, normalize};
pub use provider::{ActionLogger, NoopLogger, TracingLogger};
pub use result::{FinalResult, Outcome, previous_data};
