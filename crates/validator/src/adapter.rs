//! The validation adapter contract.
//!
//! The action executor never looks inside a schema. It hands raw input to
//! a [`ValidationAdapter`] and receives a [`ValidationOutcome`] back. An
//! adapter may suspend (remote lookups, database uniqueness checks) and
//! may fail outright; a failure is reported as `Err` and handled by the
//! caller as a thrown error, never as a validation issue.

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::issue::Issue;
use crate::outcome::ValidationOutcome;

/// Failure raised by an adapter itself (as opposed to rejected input).
pub type AdapterError = anyhow::Error;

/// Anything that can check a JSON value.
///
/// Implemented by [`Schema`](crate::Schema), [`FnAdapter`] and
/// [`SerdeAdapter`]; third-party schema libraries implement it to plug in.
#[async_trait]
pub trait ValidationAdapter: Send + Sync {
    /// Validates `input`, returning the validated value or the issues found.
    async fn validate(&self, input: Value) -> Result<ValidationOutcome, AdapterError>;
}

type CheckFn = dyn Fn(&Value) -> Result<ValidationOutcome, AdapterError> + Send + Sync;

/// Adapter backed by a synchronous closure.
///
/// ```rust,ignore
/// let positive = FnAdapter::new(|v| match v.as_i64() {
///     Some(n) if n > 0 => ValidationOutcome::Valid(v.clone()),
///     _ => ValidationOutcome::invalid("must be a positive integer"),
/// });
/// ```
pub struct FnAdapter {
    check: Box<CheckFn>,
}

impl FnAdapter {
    /// Wraps an infallible check.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> ValidationOutcome + Send + Sync + 'static,
    {
        Self {
            check: Box::new(move |value| Ok(check(value))),
        }
    }

    /// Wraps a check that may itself fail.
    pub fn try_new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> Result<ValidationOutcome, AdapterError> + Send + Sync + 'static,
    {
        Self {
            check: Box::new(check),
        }
    }
}

impl fmt::Debug for FnAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAdapter").finish_non_exhaustive()
    }
}

#[async_trait]
impl ValidationAdapter for FnAdapter {
    async fn validate(&self, input: Value) -> Result<ValidationOutcome, AdapterError> {
        (self.check)(&input)
    }
}

/// Adapter that validates by deserializing into `T`.
///
/// On success the value is re-serialized from `T`, so serde defaults and
/// renames are reflected in what the handler receives. A deserialization
/// failure becomes a single root issue carrying serde's message.
pub struct SerdeAdapter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeAdapter<T> {
    /// Creates the adapter.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SerdeAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerdeAdapter")
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

#[async_trait]
impl<T> ValidationAdapter for SerdeAdapter<T>
where
    T: DeserializeOwned + Serialize + 'static,
{
    async fn validate(&self, input: Value) -> Result<ValidationOutcome, AdapterError> {
        match serde_json::from_value::<T>(input) {
            Ok(typed) => Ok(ValidationOutcome::Valid(serde_json::to_value(typed)?)),
            Err(e) => Ok(ValidationOutcome::Invalid(vec![Issue::root(e.to_string())])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Signup {
        email: String,
        #[serde(default)]
        newsletter: bool,
    }

    #[tokio::test]
    async fn fn_adapter_runs_closure() {
        let adapter = FnAdapter::new(|v| {
            if v.is_string() {
                ValidationOutcome::Valid(v.clone())
            } else {
                ValidationOutcome::invalid("expected a string")
            }
        });
        assert!(adapter.validate(json!("ok")).await.unwrap().is_valid());
        assert!(!adapter.validate(json!(1)).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn fallible_fn_adapter_propagates_failure() {
        let adapter = FnAdapter::try_new(|_| Err(anyhow::anyhow!("schema backend offline")));
        let err = adapter.validate(json!(null)).await.unwrap_err();
        assert_eq!(err.to_string(), "schema backend offline");
    }

    #[tokio::test]
    async fn serde_adapter_fills_defaults() {
        let adapter = SerdeAdapter::<Signup>::new();
        let outcome = adapter.validate(json!({"email": "a@b.io"})).await.unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::Valid(json!({"email": "a@b.io", "newsletter": false}))
        );
    }

    #[tokio::test]
    async fn serde_adapter_reports_root_issue() {
        let adapter = SerdeAdapter::<Signup>::new();
        let outcome = adapter.validate(json!({"newsletter": true})).await.unwrap();
        let issues = outcome.issues();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].path.is_empty());
        assert!(issues[0].message.contains("email"));
    }
}
