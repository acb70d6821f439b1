//! Structured logging configuration.

use crate::config::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Primary filter variable.
pub const LOG_ENV: &str = "SEENGATE_LOG";

const DEFAULT_LEVEL: &str = "info";
const VERBOSE_LEVEL: &str = "debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, falling back to [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Event filter.
    pub filter: EnvFilter,
    /// Output format.
    pub format: LogFormat,
    /// Log file; stderr when `None`.
    pub file: Option<std::path::PathBuf>,
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    ///
    /// The filter is taken from `SEENGATE_LOG`, then `RUST_LOG`, then the
    /// config file's `level`. `verbose` raises the fallback level to `debug`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let directive = filter_directive(
            std::env::var(LOG_ENV).ok(),
            std::env::var("RUST_LOG").ok(),
            settings.and_then(|s| s.level.clone()),
            verbose,
        );
        let filter = EnvFilter::try_new(&directive)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
        let format = settings
            .and_then(|s| s.format.as_deref())
            .map(LogFormat::parse)
            .unwrap_or_default();
        let file = settings.and_then(|s| s.file.clone());

        Self {
            filter,
            format,
            file,
        }
    }
}

fn filter_directive(
    primary: Option<String>,
    rust_log: Option<String>,
    configured: Option<String>,
    verbose: bool,
) -> String {
    primary
        .into_iter()
        .chain(rust_log)
        .chain(configured)
        .find(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| {
            if verbose {
                VERBOSE_LEVEL.to_string()
            } else {
                DEFAULT_LEVEL.to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("json", LogFormat::Json)]
    #[test_case("JSON", LogFormat::Json)]
    #[test_case("pretty", LogFormat::Pretty)]
    #[test_case("bogus", LogFormat::Pretty)]
    fn test_log_format_parse(input: &str, expected: LogFormat) {
        assert_eq!(LogFormat::parse(input), expected);
    }

    #[test]
    fn test_filter_precedence() {
        let some = |s: &str| Some(s.to_string());

        assert_eq!(filter_directive(some("trace"), some("warn"), some("error"), false), "trace");
        assert_eq!(filter_directive(None, some("warn"), some("error"), false), "warn");
        assert_eq!(filter_directive(some(" "), None, some("error"), false), "error");
        assert_eq!(filter_directive(None, None, None, false), "info");
        assert_eq!(filter_directive(None, None, None, true), "debug");
    }
}
