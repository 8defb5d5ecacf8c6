//! The frozen declaration shared by every invocation of an action.

use std::fmt;
use std::sync::Arc;

use craft_validator::ValidationAdapter;

use crate::catalog::ErrorCatalog;
use crate::config::{ActionOptions, ResultShape, ThrownErrorTransform};
use crate::handler::ActionHandler;
use crate::hooks::LifecycleHooks;
use crate::provider::ActionLogger;

/// Frozen definition of an action, shared read-only by every invocation.
pub(crate) struct ActionSpec {
    pub(crate) options: ActionOptions,
    pub(crate) shape: ResultShape,
    pub(crate) logger: Option<Arc<dyn ActionLogger>>,
    pub(crate) thrown_error_transform: Option<ThrownErrorTransform>,
    pub(crate) input: Option<Arc<dyn ValidationAdapter>>,
    pub(crate) output: Option<Arc<dyn ValidationAdapter>>,
    pub(crate) bind_args: Vec<Arc<dyn ValidationAdapter>>,
    pub(crate) errors: Arc<ErrorCatalog>,
    pub(crate) handler: Arc<dyn ActionHandler>,
    pub(crate) hooks: Vec<Arc<dyn LifecycleHooks>>,
}

impl ActionSpec {
    pub(crate) fn name(&self) -> Option<&str> {
        self.options.name.as_deref()
    }

    pub(crate) fn is_stateful(&self) -> bool {
        self.shape == ResultShape::Stateful
    }

    pub(crate) fn logger(&self) -> Option<&dyn ActionLogger> {
        self.logger.as_deref()
    }
}

impl fmt::Debug for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSpec")
            .field("options", &self.options)
            .field("shape", &self.shape)
            .field("input", &self.input.is_some())
            .field("output", &self.output.is_some())
            .field("bind_args", &self.bind_args.len())
            .field("errors", &self.errors)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
