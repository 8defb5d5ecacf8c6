//! Issue model shared by every validation adapter.
//!
//! An [`Issue`] is a single failed check: where it happened (a path into
//! the input) and what went wrong. Adapters report an ordered list of them;
//! the action layer decides how that list is encoded for the client.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of an issue path: an object key or an array index.
///
/// Serializes untagged, so a path reads as `["items", 0, "name"]` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array position.
    Index(usize),
    /// Object key.
    Key(String),
}

impl PathSegment {
    /// Renders the segment as a map key (indices become decimal strings).
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Index(index) => index.to_string(),
        }
    }

    /// JSON representation of the segment.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Key(key) => Value::String(key.clone()),
            Self::Index(index) => Value::from(*index),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A single validation failure.
///
/// An empty `path` means the failure concerns the input as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Location of the offending value inside the input.
    pub path: Vec<PathSegment>,
    /// Human-readable description.
    pub message: String,
}

impl Issue {
    /// Issue about the whole input.
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Issue at an explicit path.
    pub fn at<I, S>(path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// Returns the issue with `segment` prepended to its path.
    #[must_use]
    pub fn prefixed(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    /// First path segment, if the issue is not about the root.
    #[must_use]
    pub fn first_segment(&self) -> Option<&PathSegment> {
        self.path.first()
    }

    /// Dotted rendering of the path, e.g. `items.0.name`.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// `{ "path": [...], "message": "..." }`
    #[must_use]
    pub fn to_json(&self) -> Value {
        let path = self.path.iter().map(PathSegment::to_json).collect();
        let mut map = serde_json::Map::new();
        map.insert("path".to_owned(), Value::Array(path));
        map.insert("message".to_owned(), Value::String(self.message.clone()));
        Value::Object(map)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.dotted_path(), self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_serializes_untagged() {
        let issue = Issue::at([PathSegment::from("items"), 0.into(), "name".into()], "bad");
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            json!({"path": ["items", 0, "name"], "message": "bad"})
        );
        assert_eq!(issue.to_json(), serde_json::to_value(&issue).unwrap());
    }

    #[test]
    fn prefixed_inserts_at_front() {
        let issue = Issue::at(["email"], "invalid").prefixed(2usize);
        assert_eq!(issue.path, vec![PathSegment::Index(2), "email".into()]);
        assert_eq!(issue.first_segment().map(PathSegment::as_key), Some("2".into()));
    }

    #[test]
    fn display_includes_dotted_path() {
        assert_eq!(Issue::root("nope").to_string(), "nope");
        assert_eq!(
            Issue::at(["a", "b"], "nope").to_string(),
            "a.b: nope"
        );
    }

    #[test]
    fn deserializes_mixed_path() {
        let issue: Issue =
            serde_json::from_value(json!({"path": ["tags", 3], "message": "m"})).unwrap();
        assert_eq!(issue.path, vec!["tags".into(), PathSegment::Index(3)]);
    }
}
