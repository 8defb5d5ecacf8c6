//! # Craft Log
//!
//! Subscriber setup for services that host crafted actions.
//!
//! Library crates in this workspace only emit `tracing` events; this crate
//! decides where they go.
//!
//! ```rust,ignore
//! let _guard = craft_log::init()?;              // CRAFT_LOG / RUST_LOG
//! let _guard = craft_log::init_with(craft_log::Config::production())?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, Format, Writer};
pub use error::{LogError, LogResult};

/// Installs the global subscriber configured from the environment.
///
/// # Errors
///
/// See [`LoggerBuilder::build`].
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::from_env())
}

/// Installs the global subscriber for `config`.
///
/// # Errors
///
/// See [`LoggerBuilder::build`].
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Installs a test subscriber, ignoring an already installed one.
///
/// Safe to call from every test; output goes to the captured test writer.
pub fn init_test() {
    let _ = LoggerBuilder::from_config(Config::test()).build();
}
