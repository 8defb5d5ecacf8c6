//! Declaration surface: [`ActionClient`] and [`ActionBuilder`].
//!
//! A client carries defaults shared by many actions. Each
//! [`ActionClient::action`] call starts a builder that accumulates adapters,
//! error constructors and hooks, and [`ActionBuilder::handler`] freezes the
//! result into a [`CraftedAction`].

use std::future::Future;
use std::sync::Arc;

use craft_validator::ValidationAdapter;
use serde_json::Value;

use crate::action::CraftedAction;
use crate::catalog::ErrorCatalog;
use crate::config::{ActionConfig, ActionOptions, ResultFormat};
use crate::context::HandlerContext;
use crate::error::{ActionError, ValidationErrorFormat};
use crate::handler::{ActionHandler, HandlerOutput};
use crate::hooks::{ErrorEvent, Hooks, LifecycleHooks, SettledEvent, StartEvent, SuccessEvent};
use crate::provider::{ActionLogger, TracingLogger};
use crate::spec::ActionSpec;

/// Factory for actions sharing one configuration.
///
/// `ActionClient::new()` logs through [`TracingLogger`];
/// [`ActionClient::bare`] has no logger at all.
#[derive(Debug, Clone)]
pub struct ActionClient {
    config: ActionConfig,
}

impl Default for ActionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionClient {
    /// Client with default options and the tracing logger.
    pub fn new() -> Self {
        Self {
            config: ActionConfig {
                logger: Some(Arc::new(TracingLogger)),
                ..ActionConfig::default()
            },
        }
    }

    /// Client with default options, no logger and no transform.
    pub fn bare() -> Self {
        Self::from_config(ActionConfig::default())
    }

    /// Client from a full configuration.
    pub fn from_config(config: ActionConfig) -> Self {
        Self { config }
    }

    /// Replaces the data options, keeping logger and transform.
    pub fn with_options(mut self, options: ActionOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Sets the logger.
    pub fn logger(mut self, logger: impl ActionLogger + 'static) -> Self {
        self.config.logger = Some(Arc::new(logger));
        self
    }

    /// Removes the logger.
    pub fn without_logger(mut self) -> Self {
        self.config.logger = None;
        self
    }

    /// Sets the thrown-error transform.
    pub fn handle_thrown_error<F>(mut self, transform: F) -> Self
    where
        F: Fn(&anyhow::Error) -> anyhow::Result<ActionError> + Send + Sync + 'static,
    {
        self.config.thrown_error_transform = Some(Arc::new(transform));
        self
    }

    /// Sets the result format.
    pub fn result_format(mut self, format: ResultFormat) -> Self {
        self.config.options.result_format = format;
        self
    }

    /// Sets the validation-error encoding.
    pub fn validation_errors(mut self, format: ValidationErrorFormat) -> Self {
        self.config.options.validation_errors = format;
        self
    }

    /// Shared configuration.
    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    /// Starts declaring an action.
    pub fn action(&self) -> ActionBuilder {
        ActionBuilder::new(self.config.clone())
    }
}

/// Accumulates one action's declaration.
pub struct ActionBuilder {
    config: ActionConfig,
    input: Option<Arc<dyn ValidationAdapter>>,
    output: Option<Arc<dyn ValidationAdapter>>,
    bind_args: Vec<Arc<dyn ValidationAdapter>>,
    errors: ErrorCatalog,
    hooks: Vec<Arc<dyn LifecycleHooks>>,
    closures: Hooks,
}

impl ActionBuilder {
    /// Builder with the given configuration and nothing declared.
    pub fn new(config: ActionConfig) -> Self {
        Self {
            config,
            input: None,
            output: None,
            bind_args: Vec::new(),
            errors: ErrorCatalog::new(),
            hooks: Vec::new(),
            closures: Hooks::new(),
        }
    }

    /// Sets the action name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.options.name = Some(name.into());
        self
    }

    /// Sets the input adapter.
    pub fn input(mut self, adapter: impl ValidationAdapter + 'static) -> Self {
        self.input = Some(Arc::new(adapter));
        self
    }

    /// Sets the output adapter.
    pub fn output(mut self, adapter: impl ValidationAdapter + 'static) -> Self {
        self.output = Some(Arc::new(adapter));
        self
    }

    /// Appends one bind-argument adapter.
    pub fn bind_arg(mut self, adapter: impl ValidationAdapter + 'static) -> Self {
        self.bind_args.push(Arc::new(adapter));
        self
    }

    /// Replaces the bind-argument adapters.
    pub fn bind_args(mut self, adapters: Vec<Arc<dyn ValidationAdapter>>) -> Self {
        self.bind_args = adapters;
        self
    }

    /// Declares a named error constructor.
    pub fn error<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(Value) -> ActionError + Send + Sync + 'static,
    {
        self.errors.insert(name, constructor);
        self
    }

    /// Registers a hook set. Sets run in registration order, closure hooks
    /// added with `on_*` run last.
    pub fn hooks(mut self, hooks: impl LifecycleHooks + 'static) -> Self {
        self.hooks.push(Arc::new(hooks));
        self
    }

    /// Sets the `on_start` closure hook.
    pub fn on_start<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(StartEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.closures = self.closures.on_start(hook);
        self
    }

    /// Sets the `on_success` closure hook.
    pub fn on_success<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(SuccessEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.closures = self.closures.on_success(hook);
        self
    }

    /// Sets the `on_error` closure hook.
    pub fn on_error<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(ErrorEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.closures = self.closures.on_error(hook);
        self
    }

    /// Sets the `on_settled` closure hook.
    pub fn on_settled<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(SettledEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.closures = self.closures.on_settled(hook);
        self
    }

    /// Enables stateful mode.
    pub fn stateful(mut self) -> Self {
        self.config.options.stateful = true;
        self
    }

    /// Overrides the result format.
    pub fn result_format(mut self, format: ResultFormat) -> Self {
        self.config.options.result_format = format;
        self
    }

    /// Overrides the validation-error encoding.
    pub fn validation_errors(mut self, format: ValidationErrorFormat) -> Self {
        self.config.options.validation_errors = format;
        self
    }

    /// Overrides the logger.
    pub fn logger(mut self, logger: impl ActionLogger + 'static) -> Self {
        self.config.logger = Some(Arc::new(logger));
        self
    }

    /// Overrides the thrown-error transform.
    pub fn handle_thrown_error<F>(mut self, transform: F) -> Self
    where
        F: Fn(&anyhow::Error) -> anyhow::Result<ActionError> + Send + Sync + 'static,
    {
        self.config.thrown_error_transform = Some(Arc::new(transform));
        self
    }

    /// Finishes the declaration with an async closure handler.
    pub fn handler<F, Fut>(self, handler: F) -> CraftedAction
    where
        F: Fn(HandlerContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<HandlerOutput>> + Send + 'static,
    {
        self.handler_with(handler)
    }

    /// Finishes the declaration with any [`ActionHandler`].
    pub fn handler_with(self, handler: impl ActionHandler) -> CraftedAction {
        let Self {
            config,
            input,
            output,
            bind_args,
            errors,
            mut hooks,
            closures,
        } = self;
        if !closures.is_empty() {
            hooks.push(Arc::new(closures));
        }
        let ActionConfig {
            options,
            logger,
            thrown_error_transform,
        } = config;
        let shape = options.result_shape();
        CraftedAction::from_spec(ActionSpec {
            options,
            shape,
            logger,
            thrown_error_transform,
            input,
            output,
            bind_args,
            errors: Arc::new(errors),
            handler: Arc::new(handler),
            hooks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResultShape;

    #[test]
    fn client_defaults_flow_into_actions() {
        let client = ActionClient::bare().result_format(ResultFormat::Functional);
        let action = client
            .action()
            .name("ping")
            .handler(|_ctx| async { Ok(HandlerOutput::ok("pong")) });
        assert_eq!(action.name(), Some("ping"));
        assert_eq!(action.shape(), ResultShape::Functional);
    }

    #[test]
    fn stateful_wins_over_format() {
        let action = ActionClient::bare()
            .result_format(ResultFormat::Functional)
            .action()
            .stateful()
            .handler(|_ctx| async { Ok(HandlerOutput::Nothing) });
        assert_eq!(action.shape(), ResultShape::Stateful);
    }

    #[test]
    fn new_client_logs_through_tracing() {
        assert!(ActionClient::new().config().logger.is_some());
        assert!(ActionClient::bare().config().logger.is_none());
        assert!(ActionClient::new().without_logger().config().logger.is_none());
    }
}
