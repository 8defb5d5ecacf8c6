//! The callable produced by the builder.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::ResultShape;
use crate::error::ActionError;
use crate::executor;
use crate::id::ActionId;
use crate::input::RawArg;
use crate::result::FinalResult;
use crate::spec::ActionSpec;

/// A declared action, ready to be called.
///
/// Cheap to clone; clones share the frozen definition and the identity, so
/// results from any clone carry the same [`ActionId`]. Concurrent calls are
/// independent of each other.
#[derive(Clone)]
pub struct CraftedAction {
    id: ActionId,
    spec: Arc<ActionSpec>,
}

impl CraftedAction {
    pub(crate) fn from_spec(spec: ActionSpec) -> Self {
        Self {
            id: ActionId::v4(),
            spec: Arc::new(spec),
        }
    }

    /// Identity stamped on every result of this action.
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// Declared name.
    pub fn name(&self) -> Option<&str> {
        self.spec.name()
    }

    /// Wire shape of this action's results.
    pub fn shape(&self) -> ResultShape {
        self.spec.shape
    }

    /// Placeholder result to pass as the previous result before the first
    /// stateful call.
    pub fn initial_state(&self) -> FinalResult {
        FinalResult::new(self.id, self.spec.shape, Err(ActionError::InitialState), None)
    }

    /// Runs the action on raw arguments.
    ///
    /// Arguments are laid out as: one per bind-argument adapter, then the
    /// previous result (stateful mode), then the main input. A missing main
    /// input is `null`.
    pub async fn run(&self, args: Vec<RawArg>) -> FinalResult {
        executor::execute(self.id, &self.spec, args).await
    }

    /// Calls the action with a main input only.
    pub async fn call(&self, input: impl Into<RawArg>) -> FinalResult {
        self.run(vec![input.into()]).await
    }

    /// Calls the action with bind arguments and a main input.
    pub async fn call_bound(&self, bind_args: Vec<Value>, input: impl Into<RawArg>) -> FinalResult {
        let mut args: Vec<RawArg> = bind_args.into_iter().map(RawArg::Json).collect();
        args.push(input.into());
        self.run(args).await
    }

    /// Calls a stateful action with the previous result and a main input.
    pub async fn call_stateful(
        &self,
        prev: impl Into<Value>,
        input: impl Into<RawArg>,
    ) -> FinalResult {
        self.run(vec![RawArg::Json(prev.into()), input.into()]).await
    }
}

impl fmt::Debug for CraftedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CraftedAction")
            .field("id", &self.id)
            .field("spec", &self.spec)
            .finish()
    }
}
