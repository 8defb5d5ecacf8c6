//! Lifecycle hooks and their dispatcher.
//!
//! Hooks observe an invocation; they never influence it. Per invocation the
//! order is `on_start`, then exactly one of `on_success` / `on_error`, then
//! `on_settled`. A hook that returns `Err` or panics is reported to the
//! action's logger and otherwise ignored.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Value, json};

use crate::error::ActionError;
use crate::metadata::CallbackMetadata;
use crate::normalize::panic_message;
use crate::provider::ActionLogger;
use crate::result::{FinalResult, Outcome};

/// Payload of `on_start`.
#[derive(Debug, Clone)]
pub struct StartEvent {
    /// Invocation metadata; nothing is validated yet.
    pub metadata: CallbackMetadata,
}

/// Payload of `on_success`.
#[derive(Debug, Clone)]
pub struct SuccessEvent {
    /// Success data, after output validation.
    pub data: Value,
    /// Invocation metadata.
    pub metadata: CallbackMetadata,
}

/// Payload of `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    /// The error before normalization; internal tags are still visible.
    pub error: ActionError,
    /// Invocation metadata.
    pub metadata: CallbackMetadata,
}

/// Payload of `on_settled`.
#[derive(Debug, Clone)]
pub struct SettledEvent {
    /// The result exactly as the caller receives it.
    pub result: FinalResult,
    /// The outcome before normalization.
    pub outcome: Outcome,
    /// Invocation metadata.
    pub metadata: CallbackMetadata,
}

/// Observer of action invocations.
///
/// Every method defaults to a no-op, so implementors only override the
/// events they care about.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    /// Called before validation starts.
    async fn on_start(&self, _event: StartEvent) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called when the invocation succeeded.
    async fn on_success(&self, _event: SuccessEvent) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called when the invocation failed, with the unnormalized error.
    async fn on_error(&self, _event: ErrorEvent) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called last, on every path.
    async fn on_settled(&self, _event: SettledEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

type HookFn<E> = Arc<dyn Fn(E) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

fn boxed<E, F, Fut>(hook: F) -> HookFn<E>
where
    E: Send + 'static,
    F: Fn(E) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |event: E| -> BoxFuture<'static, anyhow::Result<()>> { hook(event).boxed() })
}

/// [`LifecycleHooks`] assembled from async closures.
///
/// ```rust,ignore
/// let hooks = Hooks::new()
///     .on_error(|event| async move {
///         tracing::warn!(kind = event.error.type_tag(), "action failed");
///         Ok(())
///     });
/// ```
#[derive(Clone, Default)]
pub struct Hooks {
    on_start: Option<HookFn<StartEvent>>,
    on_success: Option<HookFn<SuccessEvent>>,
    on_error: Option<HookFn<ErrorEvent>>,
    on_settled: Option<HookFn<SettledEvent>>,
}

impl Hooks {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `on_start` hook.
    pub fn on_start<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(StartEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_start = Some(boxed(hook));
        self
    }

    /// Sets the `on_success` hook.
    pub fn on_success<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(SuccessEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_success = Some(boxed(hook));
        self
    }

    /// Sets the `on_error` hook.
    pub fn on_error<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(ErrorEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_error = Some(boxed(hook));
        self
    }

    /// Sets the `on_settled` hook.
    pub fn on_settled<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(SettledEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_settled = Some(boxed(hook));
        self
    }

    /// Returns `true` if no hook is set.
    pub fn is_empty(&self) -> bool {
        self.on_start.is_none()
            && self.on_success.is_none()
            && self.on_error.is_none()
            && self.on_settled.is_none()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_settled", &self.on_settled.is_some())
            .finish()
    }
}

#[async_trait]
impl LifecycleHooks for Hooks {
    async fn on_start(&self, event: StartEvent) -> anyhow::Result<()> {
        match &self.on_start {
            Some(hook) => hook(event).await,
            None => Ok(()),
        }
    }

    async fn on_success(&self, event: SuccessEvent) -> anyhow::Result<()> {
        match &self.on_success {
            Some(hook) => hook(event).await,
            None => Ok(()),
        }
    }

    async fn on_error(&self, event: ErrorEvent) -> anyhow::Result<()> {
        match &self.on_error {
            Some(hook) => hook(event).await,
            None => Ok(()),
        }
    }

    async fn on_settled(&self, event: SettledEvent) -> anyhow::Result<()> {
        match &self.on_settled {
            Some(hook) => hook(event).await,
            None => Ok(()),
        }
    }
}

/// Runs hook sets in registration order with failure isolation.
pub(crate) struct Dispatcher<'a> {
    hooks: &'a [Arc<dyn LifecycleHooks>],
    logger: Option<&'a dyn ActionLogger>,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(
        hooks: &'a [Arc<dyn LifecycleHooks>],
        logger: Option<&'a dyn ActionLogger>,
    ) -> Self {
        Self { hooks, logger }
    }

    pub(crate) async fn start(&self, event: &StartEvent) {
        for hooks in self.hooks {
            self.isolate("on_start", hooks.on_start(event.clone())).await;
        }
    }

    pub(crate) async fn success(&self, event: &SuccessEvent) {
        for hooks in self.hooks {
            self.isolate("on_success", hooks.on_success(event.clone())).await;
        }
    }

    pub(crate) async fn error(&self, event: &ErrorEvent) {
        for hooks in self.hooks {
            self.isolate("on_error", hooks.on_error(event.clone())).await;
        }
    }

    pub(crate) async fn settled(&self, event: &SettledEvent) {
        for hooks in self.hooks {
            self.isolate("on_settled", hooks.on_settled(event.clone())).await;
        }
    }

    async fn isolate<F>(&self, hook: &'static str, call: F)
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        let failure = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Ok(())) => return,
            Ok(Err(error)) => json!({ "hook": hook, "error": format!("{error:#}") }),
            Err(payload) => json!({ "hook": hook, "panic": panic_message(payload.as_ref()) }),
        };
        tracing::debug!(hook, %failure, "lifecycle hook failed");
        if let Some(logger) = self.logger {
            logger.error("Lifecycle hook failed", &failure);
        }
    }
}
