//! Configuration presets for common scenarios

use super::{Config, Format, Writer};

impl Config {
    /// Create configuration from environment variables
    ///
    /// `CRAFT_LOG` (falling back to `RUST_LOG`) sets the filter,
    /// `CRAFT_LOG_FORMAT` the format and `CRAFT_SERVICE` the service name.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Parse CRAFT_LOG or RUST_LOG
        if let Some(level) = lookup("CRAFT_LOG").or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }

        if let Some(format) = lookup("CRAFT_LOG_FORMAT") {
            config.format = Format::parse_lossy(&format);
        }

        if let Some(ansi) = lookup("NO_COLOR") {
            config.ansi = ansi.is_empty();
        }

        config.service = lookup("CRAFT_SERVICE");
        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            ansi: true,
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            ansi: false,
            ..Self::default()
        }
    }

    /// Test configuration (captured by the test harness)
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: "trace".to_string(),
            format: Format::Compact,
            ansi: false,
            writer: Writer::Test,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use pretty_assertions::assert_eq;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn craft_log_wins_over_rust_log() {
        let config = Config::from_lookup(env(&[("CRAFT_LOG", "debug"), ("RUST_LOG", "warn")]));
        assert_eq!(config.level, "debug");

        let config = Config::from_lookup(env(&[("RUST_LOG", "warn")]));
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn empty_environment_is_default() {
        assert_eq!(Config::from_lookup(env(&[])), Config::default());
    }

    #[test]
    fn format_and_service() {
        let config = Config::from_lookup(env(&[
            ("CRAFT_LOG_FORMAT", "JSON"),
            ("CRAFT_SERVICE", "checkout"),
            ("NO_COLOR", "1"),
        ]));
        assert_eq!(config.format, Format::Json);
        assert_eq!(config.service.as_deref(), Some("checkout"));
        assert!(!config.ansi);
    }

    #[test]
    fn presets() {
        assert_eq!(Config::development().format, Format::Pretty);
        assert_eq!(Config::production().format, Format::Json);
        assert!(!Config::production().ansi);
        assert_eq!(Config::test().writer, Writer::Test);
    }
}
