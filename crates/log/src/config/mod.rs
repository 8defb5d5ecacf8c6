//! Logger configuration

mod presets;

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::TestWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filter directives, `EnvFilter` syntax (`info`, `craft_action=debug,warn`)
    pub level: String,
    /// Output format
    pub format: Format,
    /// Colored output (ignored by [`Format::Json`])
    pub ansi: bool,
    /// Include the event target
    pub target: bool,
    /// Output destination
    pub writer: Writer,
    /// Service name recorded on a root span, if set
    pub service: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Compact,
            ansi: true,
            target: true,
            writer: Writer::Stderr,
            service: None,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Multi-line, human-oriented
    Pretty,
    /// Single-line
    #[default]
    Compact,
    /// Newline-delimited JSON
    Json,
}

impl Format {
    /// Parses a format name; unknown names fall back to [`Format::Compact`].
    pub fn parse_lossy(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Output destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Writer {
    /// Standard error
    #[default]
    Stderr,
    /// Standard output
    Stdout,
    /// libtest's captured output
    Test,
}

impl Writer {
    pub(crate) fn make_writer(self) -> BoxMakeWriter {
        match self {
            Self::Stderr => BoxMakeWriter::new(std::io::stderr),
            Self::Stdout => BoxMakeWriter::new(std::io::stdout),
            Self::Test => BoxMakeWriter::new(TestWriter::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pretty", Format::Pretty)]
    #[case("Json", Format::Json)]
    #[case("compact", Format::Compact)]
    #[case("logfmt", Format::Compact)]
    fn format_names(#[case] name: &str, #[case] expected: Format) {
        assert_eq!(Format::parse_lossy(name), expected);
    }
}
