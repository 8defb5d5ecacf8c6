//! Raw call arguments.
//!
//! A crafted action is called with positional [`RawArg`]s. Most are plain
//! JSON; form submissions arrive as [`FormData`], a key/value/file multimap
//! that is flattened before any adapter sees it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys with this prefix belong to the host framework and are dropped.
pub const RESERVED_KEY_PREFIX: &str = "$ACTION_";

/// Uploaded file metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Client-side file name.
    pub name: String,
    /// MIME type reported by the client.
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileEntry {
    fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_owned(), Value::String(self.name.clone()));
        map.insert(
            "contentType".to_owned(),
            Value::String(self.content_type.clone()),
        );
        map.insert("size".to_owned(), Value::from(self.size));
        Value::Object(map)
    }
}

/// One value in a [`FormData`] entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Text field.
    Text(String),
    /// File field.
    File(FileEntry),
}

impl FormValue {
    fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::File(file) => file.to_json(),
        }
    }

    fn as_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::File(file) => &file.name,
        }
    }
}

/// Form submission: keys may repeat, values stay grouped per key in
/// submission order, keys in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: IndexMap<String, Vec<FormValue>>,
    len: usize,
}

impl FormData {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text value.
    #[must_use]
    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, FormValue::Text(value.into()));
        self
    }

    /// Appends a file value.
    #[must_use]
    pub fn file(mut self, key: impl Into<String>, file: FileEntry) -> Self {
        self.append(key, FormValue::File(file));
        self
    }

    /// Appends a value under `key`.
    pub fn append(&mut self, key: impl Into<String>, value: FormValue) {
        self.entries.entry(key.into()).or_default().push(value);
        self.len += 1;
    }

    /// All values under `key`, in submission order.
    pub fn get_all(&self, key: &str) -> &[FormValue] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Distinct keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries, counting repeats.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the form has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn collapse<F>(&self, convert: F) -> Value
    where
        F: Fn(&FormValue) -> Value,
    {
        let out = self
            .entries
            .iter()
            .filter(|(key, _)| !key.starts_with(RESERVED_KEY_PREFIX))
            .map(|(key, values)| {
                let value = match values.as_slice() {
                    [single] => convert(single),
                    many => Value::Array(many.iter().map(&convert).collect()),
                };
                (key.clone(), value)
            })
            .collect();
        Value::Object(out)
    }

    /// Flattens into the object adapters validate: one value per key
    /// collapses to a scalar, several become an array, reserved keys drop.
    pub fn flatten(&self) -> Value {
        self.collapse(FormValue::to_json)
    }

    /// String / string-array map echoed back in stateful results.
    /// Files are represented by their file name.
    pub fn to_values(&self) -> Value {
        self.collapse(|v| Value::String(v.as_text().to_owned()))
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (key, value) in iter {
            form.append(key, FormValue::Text(value.into()));
        }
        form
    }
}

/// One positional argument of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum RawArg {
    /// Plain JSON.
    Json(Value),
    /// Form submission.
    Form(FormData),
}

impl RawArg {
    /// The value handed to validation adapters.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Form(form) => form.flatten(),
        }
    }

    /// The `values` payload of a stateful result.
    pub fn to_values(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Form(form) => form.to_values(),
        }
    }
}

impl From<Value> for RawArg {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<FormData> for RawArg {
    fn from(form: FormData) -> Self {
        Self::Form(form)
    }
}
