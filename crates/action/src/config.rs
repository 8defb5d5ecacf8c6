//! Action configuration.
//!
//! [`ActionOptions`] is the plain-data part and deserializes from any serde
//! format, so defaults can live in a config file. [`ActionConfig`] adds the
//! two behavioural hooks that cannot be data: the logger and the
//! thrown-error transform.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, ValidationErrorFormat};
use crate::provider::ActionLogger;

/// Maps an error thrown by user code to the error value the action returns.
///
/// Returning `Err` (or panicking) makes the action fall back to the default
/// `UNHANDLED` value.
pub type ThrownErrorTransform =
    Arc<dyn Fn(&anyhow::Error) -> anyhow::Result<ActionError> + Send + Sync>;

/// Result shape selected by configuration (ignored in stateful mode).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultFormat {
    /// `{ success, data | error, id }`
    #[default]
    Api,
    /// `{ type: "ok" | "err", value | error, id }`
    Functional,
}

/// Wire shape a built action emits, resolved once at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultShape {
    /// API shape.
    Api,
    /// Functional shape.
    Functional,
    /// API shape plus `values`.
    Stateful,
}

/// Serializable action options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionOptions {
    /// Human-readable action name, used in logs and the default server error.
    pub name: Option<String>,
    /// Result shape outside stateful mode.
    pub result_format: ResultFormat,
    /// Encoding of validation errors.
    pub validation_errors: ValidationErrorFormat,
    /// Stateful mode: previous result in, `values` out.
    pub stateful: bool,
}

impl ActionOptions {
    /// Stateful mode wins over `result_format`.
    pub fn result_shape(&self) -> ResultShape {
        if self.stateful {
            return ResultShape::Stateful;
        }
        match self.result_format {
            ResultFormat::Api => ResultShape::Api,
            ResultFormat::Functional => ResultShape::Functional,
        }
    }
}

/// Full configuration of an action.
#[derive(Clone, Default)]
pub struct ActionConfig {
    /// Data options.
    pub options: ActionOptions,
    /// Diagnostics sink. `None` is silent.
    pub logger: Option<Arc<dyn ActionLogger>>,
    /// Thrown-error transform. `None` means the default `UNHANDLED` value.
    pub thrown_error_transform: Option<ThrownErrorTransform>,
}

impl ActionConfig {
    /// Configuration with the given options and no logger or transform.
    pub fn from_options(options: ActionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

impl fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionConfig")
            .field("options", &self.options)
            .field("logger", &self.logger.is_some())
            .field(
                "thrown_error_transform",
                &self.thrown_error_transform.is_some(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(false, ResultFormat::Api, ResultShape::Api)]
    #[case(false, ResultFormat::Functional, ResultShape::Functional)]
    #[case(true, ResultFormat::Functional, ResultShape::Stateful)]
    #[case(true, ResultFormat::Api, ResultShape::Stateful)]
    fn stateful_overrides_format(
        #[case] stateful: bool,
        #[case] result_format: ResultFormat,
        #[case] expected: ResultShape,
    ) {
        let options = ActionOptions {
            stateful,
            result_format,
            ..ActionOptions::default()
        };
        assert_eq!(options.result_shape(), expected);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ActionOptions = serde_json::from_value(json!({
            "name": "createPost",
            "validation_errors": "nested"
        }))
        .unwrap();
        assert_eq!(options.name.as_deref(), Some("createPost"));
        assert_eq!(options.validation_errors, ValidationErrorFormat::Nested);
        assert_eq!(options.result_format, ResultFormat::Api);
        assert!(!options.stateful);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let result = serde_json::from_value::<ActionOptions>(json!({"statefull": true}));
        assert!(result.is_err());
    }

    #[test]
    fn debug_hides_callables() {
        let config = ActionConfig::default();
        let debug = format!("{config:?}");
        assert!(debug.contains("logger: false"));
    }
}
