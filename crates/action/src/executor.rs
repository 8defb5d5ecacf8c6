//! The invocation pipeline.
//!
//! Stages run strictly in order, each a possible exit:
//!
//! 1. split raw arguments into bind args, previous result and input
//! 2. `on_start`
//! 3. bind-argument validation, first rejection wins
//! 4. input validation
//! 5. handler
//! 6. output validation, success only
//! 7. `on_success` or `on_error` with the unnormalized outcome
//! 8. normalize and format the client result
//! 9. `on_settled`
//!
//! Anything thrown or panicked by user code in stages 3 to 6 goes through
//! the thrown-error transform. Hook failures are isolated by the
//! [`Dispatcher`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use craft_validator::{Issue, ValidationAdapter, ValidationOutcome};
use futures::FutureExt;
use serde_json::{Value, json};
use tracing::Instrument;

use crate::context::HandlerContext;
use crate::error::{ActionError, ValidationErrors};
use crate::handler::HandlerOutput;
use crate::hooks::{Dispatcher, ErrorEvent, SettledEvent, StartEvent, SuccessEvent};
use crate::id::ActionId;
use crate::input::RawArg;
use crate::metadata::CallbackMetadata;
use crate::normalize::{normalize, panic_to_error, resolve_thrown};
use crate::result::{FinalResult, Outcome};
use crate::spec::ActionSpec;

pub(crate) const INPUT_VALIDATION_MESSAGE: &str = "Input validation failed";
pub(crate) const BIND_ARGS_VALIDATION_MESSAGE: &str = "Bind arguments validation failed";
pub(crate) const OUTPUT_VALIDATION_MESSAGE: &str = "Output validation failed";
pub(crate) const IMPLICIT_RETURN_MESSAGE: &str = "Action handler returned no value";

/// Runs one invocation of `spec` under a tracing span.
pub(crate) async fn execute(id: ActionId, spec: &ActionSpec, args: Vec<RawArg>) -> FinalResult {
    let span = tracing::debug_span!(
        "action",
        action.id = %id,
        action.name = spec.name().unwrap_or_default()
    );
    Invocation { id, spec }.run(args).instrument(span).await
}

/// Raw arguments after the split.
#[derive(Debug)]
struct Arguments {
    bind_args: Vec<Value>,
    prev_result: Option<Value>,
    input: Option<Value>,
    values: Option<Value>,
    violation: Option<&'static str>,
    extra: usize,
}

impl Arguments {
    fn split(args: Vec<RawArg>, bind_count: usize, stateful: bool) -> Self {
        let mut args = args.into_iter();
        let bind_args = (0..bind_count)
            .map(|_| args.next().map_or(Value::Null, |arg| arg.to_value()))
            .collect();

        let mut violation = None;
        let prev_result = if stateful {
            match args.next() {
                Some(RawArg::Json(prev)) => Some(prev),
                Some(RawArg::Form(_)) => {
                    violation = Some("previous result must be a JSON value, got form data");
                    None
                }
                None => {
                    violation = Some("stateful action called without a previous result");
                    None
                }
            }
        } else {
            None
        };

        let raw_input = args.next();
        let values = if stateful {
            raw_input.as_ref().map(RawArg::to_values)
        } else {
            None
        };

        Self {
            bind_args,
            prev_result,
            input: raw_input.as_ref().map(RawArg::to_value),
            values,
            violation,
            extra: args.count(),
        }
    }
}

struct Invocation<'a> {
    id: ActionId,
    spec: &'a ActionSpec,
}

impl Invocation<'_> {
    async fn run(self, args: Vec<RawArg>) -> FinalResult {
        let spec = self.spec;
        let dispatcher = Dispatcher::new(&spec.hooks, spec.logger());

        let mut arguments = Arguments::split(args, spec.bind_args.len(), spec.is_stateful());
        if arguments.extra > 0 {
            tracing::debug!(extra = arguments.extra, "ignoring extra arguments");
            if let Some(logger) = spec.logger() {
                logger.warn(
                    "Action called with more arguments than it accepts",
                    &json!({ "ignored": arguments.extra }),
                );
            }
        }

        let mut metadata = CallbackMetadata::new(self.id, spec.options.name.clone());
        metadata.raw_input = arguments.input.clone();
        metadata.raw_bind_args = arguments.bind_args.clone();
        metadata.prev_result = arguments.prev_result.clone();
        let values = arguments.values.take();

        dispatcher
            .start(&StartEvent {
                metadata: metadata.clone(),
            })
            .await;

        let outcome = self.stages(arguments, &mut metadata).await;

        match &outcome {
            Ok(data) => {
                tracing::debug!("action succeeded");
                dispatcher
                    .success(&SuccessEvent {
                        data: data.clone(),
                        metadata: metadata.clone(),
                    })
                    .await;
            }
            Err(error) => {
                tracing::debug!(error.kind = error.type_tag(), "action failed");
                dispatcher
                    .error(&ErrorEvent {
                        error: error.clone(),
                        metadata: metadata.clone(),
                    })
                    .await;
            }
        }

        let client = match &outcome {
            Ok(data) => Ok(data.clone()),
            Err(error) => Err(normalize(error, spec.name())),
        };
        let result = FinalResult::new(self.id, spec.shape, client, values);

        dispatcher
            .settled(&SettledEvent {
                result: result.clone(),
                outcome,
                metadata,
            })
            .await;

        result
    }

    async fn stages(&self, arguments: Arguments, metadata: &mut CallbackMetadata) -> Outcome {
        let Arguments {
            bind_args,
            prev_result,
            input,
            violation,
            ..
        } = arguments;

        if let Some(violation) = violation {
            return Err(ActionError::internal_logic(violation));
        }

        let bind_args = self.validate_bind_args(bind_args).await?;
        metadata.parsed_bind_args = Some(bind_args.clone());

        let input = self.validate_input(input.unwrap_or(Value::Null)).await?;
        metadata.parsed_input = Some(input.clone());

        let context = HandlerContext::new(
            input,
            bind_args,
            Arc::clone(&self.spec.errors),
            metadata.clone(),
            prev_result,
        );
        let data = self.invoke_handler(context).await?;

        self.validate_output(data).await
    }

    async fn validate_bind_args(&self, raw: Vec<Value>) -> Result<Vec<Value>, ActionError> {
        let mut parsed = Vec::with_capacity(raw.len());
        for (index, (adapter, value)) in self.spec.bind_args.iter().zip(raw).enumerate() {
            match self.adapt(adapter.as_ref(), value).await? {
                ValidationOutcome::Valid(value) => parsed.push(value),
                ValidationOutcome::Invalid(issues) => {
                    tracing::debug!(index, issues = issues.len(), "bind argument rejected");
                    let issues = issues
                        .into_iter()
                        .map(|issue| issue.prefixed(index))
                        .collect();
                    return Err(ActionError::BindArgsValidation(
                        self.encode(BIND_ARGS_VALIDATION_MESSAGE, issues),
                    ));
                }
            }
        }
        Ok(parsed)
    }

    async fn validate_input(&self, raw: Value) -> Result<Value, ActionError> {
        let Some(adapter) = &self.spec.input else {
            return Ok(raw);
        };
        match self.adapt(adapter.as_ref(), raw).await? {
            ValidationOutcome::Valid(value) => Ok(value),
            ValidationOutcome::Invalid(issues) => {
                tracing::debug!(issues = issues.len(), "input rejected");
                Err(ActionError::InputValidation(
                    self.encode(INPUT_VALIDATION_MESSAGE, issues),
                ))
            }
        }
    }

    async fn invoke_handler(&self, context: HandlerContext) -> Outcome {
        let output = match AssertUnwindSafe(self.spec.handler.handle(context))
            .catch_unwind()
            .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(error)) => return Err(self.thrown(&error)),
            Err(payload) => {
                return Err(self.thrown(&panic_to_error("action handler", payload.as_ref())));
            }
        };

        match output {
            HandlerOutput::Ok(data) => Ok(data),
            HandlerOutput::Nothing => Err(ActionError::ImplicitReturn {
                message: IMPLICIT_RETURN_MESSAGE.to_owned(),
            }),
            HandlerOutput::Err { error, id } => {
                if let Some(claimed) = id.filter(|claimed| *claimed != self.id) {
                    tracing::debug!(%claimed, "discarding identity supplied by the handler");
                }
                Err(error)
            }
        }
    }

    async fn validate_output(&self, data: Value) -> Outcome {
        let Some(adapter) = &self.spec.output else {
            return Ok(data);
        };
        match self.adapt(adapter.as_ref(), data).await? {
            ValidationOutcome::Valid(value) => Ok(value),
            ValidationOutcome::Invalid(issues) => {
                tracing::debug!(issues = issues.len(), "output rejected");
                Err(ActionError::OutputValidation(
                    self.encode(OUTPUT_VALIDATION_MESSAGE, issues),
                ))
            }
        }
    }

    /// Runs an adapter; `Err` or a panic takes the thrown-error path.
    async fn adapt(
        &self,
        adapter: &dyn ValidationAdapter,
        value: Value,
    ) -> Result<ValidationOutcome, ActionError> {
        let result = match AssertUnwindSafe(adapter.validate(value))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => Err(panic_to_error("validation adapter", payload.as_ref())),
        };
        result.map_err(|error| self.thrown(&error))
    }

    fn thrown(&self, error: &anyhow::Error) -> ActionError {
        resolve_thrown(
            error,
            self.spec.thrown_error_transform.as_ref(),
            self.spec.logger(),
            self.spec.name(),
        )
    }

    fn encode(&self, message: &str, issues: Vec<Issue>) -> ValidationErrors {
        ValidationErrors::from_issues(self.spec.options.validation_errors, message, issues)
    }
}
