//! # craft-validator
//!
//! The validation side of a crafted action: the [`ValidationAdapter`]
//! contract the executor consumes, the issue model every adapter reports
//! through, and a small declarative [`Schema`] for JSON input.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use craft_validator::prelude::*;
//! use serde_json::json;
//!
//! let signup = Schema::object()
//!     .field("email", Schema::string().email())
//!     .field("age", Schema::integer().min(18.0).optional());
//!
//! let outcome = signup.parse(&json!({"email": "not-an-email"}));
//! assert!(!outcome.is_valid());
//! ```
//!
//! Third-party schema libraries plug in by implementing
//! [`ValidationAdapter`]; closures and serde types are covered by
//! [`FnAdapter`] and [`SerdeAdapter`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod issue;
pub mod outcome;
pub mod prelude;
pub mod rules;
pub mod schema;

pub use adapter::{AdapterError, FnAdapter, SerdeAdapter, ValidationAdapter};
pub use issue::{Issue, PathSegment};
pub use outcome::ValidationOutcome;
pub use rules::{Validate, ValidationError};
pub use schema::Schema;
