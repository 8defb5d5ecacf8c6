//! Convenience re-exports for action authors.
//!
//! ```rust,ignore
//! use craft_action::prelude::*;
//! ```

pub use crate::action::CraftedAction;
pub use crate::builder::{ActionBuilder, ActionClient};
pub use crate::config::{ActionOptions, ResultFormat};
pub use crate::context::HandlerContext;
pub use crate::error::{ActionError, CustomError, ValidationErrorFormat};
pub use crate::handler::{ActionHandler, HandlerOutput};
pub use crate::hooks::{ErrorEvent, Hooks, LifecycleHooks, SettledEvent, StartEvent, SuccessEvent};
pub use crate::input::{FileEntry, FormData, RawArg};
pub use crate::provider::ActionLogger;
pub use crate::result::FinalResult;

pub use craft_validator::prelude::*;
