use serde_json::Value;

use crate::issue::Issue;

/// Result of running one adapter against one input.
///
/// `Valid` carries the value the adapter produced, which may differ from
/// the input (stripped keys, coerced types). `Invalid` carries the issues
/// in the order the adapter reported them.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Input accepted; the validated value.
    Valid(Value),
    /// Input rejected.
    Invalid(Vec<Issue>),
}

impl ValidationOutcome {
    /// Builds an outcome from collected issues: `Valid(value)` if none.
    pub fn from_issues(value: Value, issues: Vec<Issue>) -> Self {
        if issues.is_empty() {
            Self::Valid(value)
        } else {
            Self::Invalid(issues)
        }
    }

    /// Single root-level issue.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(vec![Issue::root(message)])
    }

    /// Returns `true` for `Valid`.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Issues reported, empty for `Valid`.
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(issues) => issues,
        }
    }

    /// Converts into a `Result`, validated value on the `Ok` side.
    pub fn into_result(self) -> Result<Value, Vec<Issue>> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(issues) => Err(issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_issues_picks_variant() {
        assert!(ValidationOutcome::from_issues(json!(1), vec![]).is_valid());
        let invalid = ValidationOutcome::from_issues(json!(1), vec![Issue::root("x")]);
        assert!(!invalid.is_valid());
        assert_eq!(invalid.issues().len(), 1);
    }

    #[test]
    fn into_result_keeps_payload() {
        assert_eq!(ValidationOutcome::Valid(json!("v")).into_result(), Ok(json!("v")));
        assert_eq!(
            ValidationOutcome::invalid("bad").into_result(),
            Err(vec![Issue::root("bad")])
        );
    }
}
