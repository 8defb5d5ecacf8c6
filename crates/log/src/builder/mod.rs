//! Logger builder implementation

// External dependencies
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Internal crates
use crate::{
    config::{Config, Format},
    error::{LogError, LogResult},
};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard that keeps the logger's root span entered
///
/// Hold it for the lifetime of the program; dropping it exits the root
/// span carrying the service name.
#[derive(Debug)]
pub struct LoggerGuard {
    _root_span: Option<tracing::span::EnteredSpan>,
}

/// Builds the registry for one format layer and installs it globally.
macro_rules! init_subscriber {
    ($filter:expr, $fmt_layer:expr) => {
        Registry::default().with($filter).with($fmt_layer).try_init()
    };
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and initialize the logger
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Filter string cannot be parsed
    /// - A global subscriber is already installed
    pub fn build(self) -> LogResult<LoggerGuard> {
        let config = self.config;

        let filter = EnvFilter::try_new(&config.level)
            .map_err(|e| LogError::Filter(format!("{}: {e}", config.level)))?;
        let writer = config.writer.make_writer();

        match config.format {
            Format::Pretty => init_subscriber!(
                filter,
                fmt::layer()
                    .pretty()
                    .with_ansi(config.ansi)
                    .with_target(config.target)
                    .with_writer(writer)
            ),
            Format::Compact => init_subscriber!(
                filter,
                fmt::layer()
                    .compact()
                    .with_ansi(config.ansi)
                    .with_target(config.target)
                    .with_writer(writer)
            ),
            Format::Json => init_subscriber!(
                filter,
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(config.target)
                    .with_writer(writer)
            ),
        }?;

        // Create root span with the service name
        let root_span = config
            .service
            .as_deref()
            .map(|service| tracing::info_span!("app", service).entered());

        Ok(LoggerGuard {
            _root_span: root_span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_is_rejected() {
        let config = Config {
            level: "craft=loudest".to_string(),
            ..Config::test()
        };
        let err = LoggerBuilder::from_config(config).build().unwrap_err();
        assert!(matches!(err, LogError::Filter(_)));
        assert!(err.to_string().contains("craft=loudest"));
    }

    #[test]
    fn second_install_fails() {
        let _first = LoggerBuilder::from_config(Config::test()).build();
        let second = LoggerBuilder::from_config(Config::test()).build();
        assert!(matches!(second, Err(LogError::Init(_))));
    }
}
