//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use craft_validator::prelude::*;
//! ```

pub use crate::adapter::{AdapterError, FnAdapter, SerdeAdapter, ValidationAdapter};
pub use crate::issue::{Issue, PathSegment};
pub use crate::outcome::ValidationOutcome;
pub use crate::rules::{
    Email, Max, MaxItems, MaxLength, Min, MinItems, MinLength, NotEmpty, Pattern, Validate,
    ValidationError, email, max, max_items, max_length, min, min_items, min_length, not_empty,
    pattern,
};
pub use crate::schema::Schema;
