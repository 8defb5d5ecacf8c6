//! Named error constructors declared on an action.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ActionError;

type Constructor = Arc<dyn Fn(Value) -> ActionError + Send + Sync>;

/// The error constructors an action declares, by name.
///
/// Handlers raise declared errors through [`raise`](Self::raise) instead of
/// building error values ad hoc, so the set of failures an action can
/// report is visible where the action is defined.
#[derive(Clone, Default)]
pub struct ErrorCatalog {
    constructors: IndexMap<String, Constructor>,
}

impl ErrorCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a constructor. Redeclaring a name replaces it.
    pub fn insert<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(Value) -> ActionError + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(constructor));
    }

    /// Builds the error declared as `name` from `args`.
    ///
    /// An undeclared name is a contract violation inside the action and
    /// yields `INTERNAL_LOGIC`, which the client only ever sees as
    /// `UNHANDLED`.
    pub fn raise(&self, name: &str, args: Value) -> ActionError {
        match self.constructors.get(name) {
            Some(constructor) => constructor(args),
            None => ActionError::internal_logic(format!(
                "error constructor `{name}` is not declared on this action"
            )),
        }
    }

    /// Returns `true` if `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Declared names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Number of declared constructors.
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Returns `true` if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for ErrorCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorCatalog")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CustomError, ErrorKind};
    use serde_json::json;

    fn catalog() -> ErrorCatalog {
        let mut catalog = ErrorCatalog::new();
        catalog.insert("NOT_FOUND", |args| {
            CustomError::new("NOT_FOUND")
                .with_message("Post not found")
                .with_field("postId", args["postId"].clone())
                .into()
        });
        catalog
    }

    #[test]
    fn raise_declared_error() {
        let err = catalog().raise("NOT_FOUND", json!({"postId": 7}));
        assert_eq!(
            err.to_json(),
            json!({"type": "NOT_FOUND", "message": "Post not found", "postId": 7})
        );
    }

    #[test]
    fn undeclared_name_is_internal_logic() {
        let err = catalog().raise("FORBIDDEN", Value::Null);
        assert_eq!(err.kind(), Some(ErrorKind::InternalLogic));
        assert!(err.to_string().contains("FORBIDDEN"));
    }

    #[test]
    fn names_and_debug() {
        let catalog = catalog();
        assert!(catalog.contains("NOT_FOUND"));
        assert_eq!(catalog.len(), 1);
        assert!(format!("{catalog:?}").contains("NOT_FOUND"));
    }

    #[test]
    fn redeclaring_keeps_the_first_position() {
        let mut catalog = catalog();
        catalog.insert("CONFLICT", |_| CustomError::new("CONFLICT").into());
        catalog.insert("NOT_FOUND", |_| CustomError::new("GONE").into());

        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["NOT_FOUND", "CONFLICT"]);
        assert_eq!(catalog.raise("NOT_FOUND", Value::Null).type_tag(), "GONE");
    }
}
