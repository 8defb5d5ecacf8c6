//! Declarative JSON schema.
//!
//! A [`Schema`] is a value-kind check plus an ordered list of
//! [`Validate`] rules, nested through `array` and `object`. Parsing walks
//! the whole input and collects every issue with its full path, so a form
//! with three bad fields reports three issues in one pass.
//!
//! ```rust,ignore
//! use craft_validator::Schema;
//!
//! let profile = Schema::object()
//!     .field("name", Schema::string().non_empty())
//!     .field("tags", Schema::array(Schema::string()).max_items(5));
//! ```
//!
//! Objects drop keys they do not declare: the validated value contains
//! only what the schema describes.

mod kind;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::adapter::{AdapterError, ValidationAdapter};
use crate::issue::{Issue, PathSegment};
use crate::outcome::ValidationOutcome;
use crate::rules::{self, Validate};

pub use kind::Kind;

/// A JSON schema node.
#[derive(Clone)]
pub struct Schema {
    kind: Kind,
    rules: Vec<Arc<dyn Validate>>,
    optional: bool,
    type_message: Option<Cow<'static, str>>,
}

impl Schema {
    fn of(kind: Kind) -> Self {
        Self {
            kind,
            rules: Vec::new(),
            optional: false,
            type_message: None,
        }
    }

    /// Accepts any value.
    pub fn any() -> Self {
        Self::of(Kind::Any)
    }

    /// Accepts strings.
    pub fn string() -> Self {
        Self::of(Kind::String)
    }

    /// Accepts whole numbers.
    pub fn integer() -> Self {
        Self::of(Kind::Integer)
    }

    /// Accepts any number.
    pub fn number() -> Self {
        Self::of(Kind::Number)
    }

    /// Accepts `true` / `false`.
    pub fn boolean() -> Self {
        Self::of(Kind::Boolean)
    }

    /// Accepts arrays whose every element matches `item`.
    pub fn array(item: Schema) -> Self {
        Self::of(Kind::Array(Box::new(item)))
    }

    /// Accepts objects; declare keys with [`field`](Self::field).
    pub fn object() -> Self {
        Self::of(Kind::Object(Vec::new()))
    }

    /// Declares an object field. No-op on non-object schemas.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        if let Kind::Object(fields) = &mut self.kind {
            fields.push((name.into(), schema));
        }
        self
    }

    /// Accepts `null` and missing object keys.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Replaces the type-mismatch / required message.
    #[must_use]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.type_message = Some(message.into());
        self
    }

    /// Appends a custom rule.
    #[must_use]
    pub fn rule(mut self, rule: impl Validate + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// String with at least `n` characters.
    #[must_use]
    pub fn min_length(self, n: usize) -> Self {
        self.rule(rules::min_length(n))
    }

    /// String with at most `n` characters.
    #[must_use]
    pub fn max_length(self, n: usize) -> Self {
        self.rule(rules::max_length(n))
    }

    /// Non-empty string.
    #[must_use]
    pub fn non_empty(self) -> Self {
        self.rule(rules::not_empty())
    }

    /// Email-shaped string.
    #[must_use]
    pub fn email(self) -> Self {
        self.rule(rules::email())
    }

    /// String matching `regex`.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn pattern(
        self,
        regex: &str,
        message: impl Into<Cow<'static, str>>,
    ) -> Result<Self, regex::Error> {
        Ok(self.rule(rules::pattern(regex, message)?))
    }

    /// Number `>= n`.
    #[must_use]
    pub fn min(self, n: f64) -> Self {
        self.rule(rules::min(n))
    }

    /// Number `<= n`.
    #[must_use]
    pub fn max(self, n: f64) -> Self {
        self.rule(rules::max(n))
    }

    /// Array with at least `n` items.
    #[must_use]
    pub fn min_items(self, n: usize) -> Self {
        self.rule(rules::min_items(n))
    }

    /// Array with at most `n` items.
    #[must_use]
    pub fn max_items(self, n: usize) -> Self {
        self.rule(rules::max_items(n))
    }

    /// The kind of value this node accepts.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Validates `input` synchronously.
    pub fn parse(&self, input: &Value) -> ValidationOutcome {
        let mut path = Vec::new();
        let mut issues = Vec::new();
        let value = self.check(Some(input), &mut path, &mut issues);
        ValidationOutcome::from_issues(value.unwrap_or(Value::Null), issues)
    }

    /// Validates one node. `None` means the key was absent.
    ///
    /// Returns the cleaned value, or `None` when the node should be
    /// omitted from its parent object.
    fn check(
        &self,
        input: Option<&Value>,
        path: &mut Vec<PathSegment>,
        issues: &mut Vec<Issue>,
    ) -> Option<Value> {
        let value = match input {
            None | Some(Value::Null) if self.optional => return input.cloned(),
            None | Some(Value::Null) if !matches!(self.kind, Kind::Any) => {
                issues.push(Issue {
                    path: path.clone(),
                    message: self
                        .type_message
                        .as_deref()
                        .unwrap_or("Required")
                        .to_owned(),
                });
                return None;
            }
            None => return None,
            Some(value) => value,
        };

        if !self.kind.accepts(value) {
            let message = match &self.type_message {
                Some(message) => message.to_string(),
                None => format!(
                    "Expected {}, received {}",
                    self.kind,
                    kind::describe(value)
                ),
            };
            issues.push(Issue {
                path: path.clone(),
                message,
            });
            return None;
        }

        for rule in &self.rules {
            if let Err(e) = rule.validate(value) {
                issues.push(Issue {
                    path: path.clone(),
                    message: e.message.into_owned(),
                });
            }
        }

        let cleaned = match (&self.kind, value) {
            (Kind::Array(item), Value::Array(elements)) => {
                let mut out = Vec::with_capacity(elements.len());
                for (index, element) in elements.iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    out.push(
                        item.check(Some(element), path, issues)
                            .unwrap_or(Value::Null),
                    );
                    path.pop();
                }
                Value::Array(out)
            }
            (Kind::Object(fields), Value::Object(map)) => {
                let mut out = Map::new();
                for (name, schema) in fields {
                    path.push(PathSegment::Key(name.clone()));
                    if let Some(v) = schema.check(map.get(name), path, issues) {
                        out.insert(name.clone(), v);
                    }
                    path.pop();
                }
                Value::Object(out)
            }
            _ => value.clone(),
        };

        Some(cleaned)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.kind)
            .field("rules", &self.rules.len())
            .field("optional", &self.optional)
            .finish()
    }
}

#[async_trait]
impl ValidationAdapter for Schema {
    async fn validate(&self, input: Value) -> Result<ValidationOutcome, AdapterError> {
        Ok(self.parse(&input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn signup() -> Schema {
        Schema::object()
            .field("email", Schema::string().email())
            .field("password", Schema::string().min_length(8))
            .field("age", Schema::integer().min(13.0).optional())
    }

    #[test]
    fn valid_object_strips_unknown_keys() {
        let outcome = signup().parse(&json!({
            "email": "a@b.io",
            "password": "hunter22!",
            "admin": true
        }));
        assert_eq!(
            outcome,
            ValidationOutcome::Valid(json!({"email": "a@b.io", "password": "hunter22!"}))
        );
    }

    #[test]
    fn collects_every_failing_field() {
        let outcome = signup().parse(&json!({"email": "nope", "age": 3}));
        let paths: Vec<String> = outcome.issues().iter().map(Issue::dotted_path).collect();
        assert_eq!(paths, vec!["email", "password", "age"]);
        assert_eq!(outcome.issues()[1].message, "Required");
    }

    #[test]
    fn type_mismatch_message() {
        let outcome = Schema::string().parse(&json!(123));
        assert_eq!(
            outcome.issues(),
            &[Issue::root("Expected string, received number")]
        );
    }

    #[test]
    fn custom_type_message() {
        let outcome = Schema::string().message("Name is required").parse(&json!(null));
        assert_eq!(outcome.issues(), &[Issue::root("Name is required")]);
    }

    #[test]
    fn array_items_get_index_paths() {
        let tags = Schema::array(Schema::string().non_empty()).max_items(3);
        let outcome = tags.parse(&json!(["a", "", "c", 4]));
        let issues = outcome.issues();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].path, Vec::<PathSegment>::new());
        assert_eq!(issues[1].path, vec![PathSegment::Index(1)]);
        assert_eq!(issues[2].path, vec![PathSegment::Index(3)]);
    }

    #[test]
    fn integer_rejects_fractions() {
        assert!(Schema::integer().parse(&json!(2)).is_valid());
        assert!(!Schema::integer().parse(&json!(2.5)).is_valid());
        assert!(Schema::number().parse(&json!(2.5)).is_valid());
    }

    #[test]
    fn any_accepts_null() {
        assert_eq!(Schema::any().parse(&json!(null)), ValidationOutcome::Valid(json!(null)));
    }

    #[tokio::test]
    async fn schema_is_an_adapter() {
        let adapter: Arc<dyn ValidationAdapter> = Arc::new(Schema::string().non_empty());
        assert!(adapter.validate(json!("hi")).await.unwrap().is_valid());
        assert!(!adapter.validate(json!("")).await.unwrap().is_valid());
    }
}
