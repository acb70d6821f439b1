//! Configuration management.

mod seen_movies;

pub use seen_movies::{Matching, ScopeSetting, SeenMoviesConfig, SeenMoviesOptions};

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the database path.
pub const DATABASE_ENV: &str = "SEENGATE_DATABASE";

/// Main configuration for seengate.
#[derive(Debug, Clone)]
pub struct SeengateConfig {
    /// Task name. Used as the partition key for `local` scope.
    pub task: String,
    /// Path to the seen-record database.
    pub database_path: PathBuf,
    /// `seen_movies` stage configuration.
    pub seen_movies: SeenMoviesConfig,
    /// Title substrings rejected by the `reject_titles` stage.
    pub reject_titles: Vec<String>,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Filter directive, e.g. `info` or `seengate=debug`.
    pub level: Option<String>,
    /// Optional log file; stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Task name.
    pub task: Option<String>,
    /// Database path.
    pub database_path: Option<String>,
    /// `seen_movies` stage configuration.
    pub seen_movies: Option<SeenMoviesConfig>,
    /// Upstream filter stages.
    pub filters: Option<ConfigFileFilters>,
    /// Logging configuration.
    pub logging: Option<LoggingSettings>,
}

/// Filters section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileFilters {
    /// Title substrings to reject.
    pub reject_titles: Option<Vec<String>>,
}

impl Default for SeengateConfig {
    fn default() -> Self {
        Self {
            task: "default".to_string(),
            database_path: default_database_path(),
            seen_movies: SeenMoviesConfig::default(),
            reject_titles: Vec::new(),
            logging: LoggingSettings::default(),
        }
    }
}

impl SeengateConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::parse(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if the text is not valid TOML or
    /// the `seen_movies` section is malformed.
    pub fn parse(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| crate::Error::InvalidInput(format!("invalid config file: {e}")))?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks `<config dir>/seengate/config.toml`, then
    /// `~/.config/seengate/config.toml`. Returns the default configuration if
    /// neither exists or parses.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let platform_config = base_dirs.config_dir().join("seengate").join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("seengate")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Applies environment overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(DATABASE_ENV) {
            if !path.is_empty() {
                self.database_path = PathBuf::from(path);
            }
        }
        self
    }

    /// Converts a `ConfigFile` to `SeengateConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(task) = file.task {
            config.task = task;
        }
        if let Some(path) = file.database_path {
            config.database_path = PathBuf::from(path);
        }
        if let Some(seen_movies) = file.seen_movies {
            config.seen_movies = seen_movies;
        }
        if let Some(titles) = file.filters.and_then(|f| f.reject_titles) {
            config.reject_titles = titles;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Sets the task name.
    #[must_use]
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = task.into();
        self
    }

    /// Sets the database path.
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }
}

/// Returns the platform default database location.
///
/// Falls back to `.seengate/seen.db` in the working directory when no home
/// directory can be determined.
#[must_use]
pub fn default_database_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".seengate").join("seen.db"),
        |dirs| dirs.data_dir().join("seengate").join("seen.db"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SeengateConfig::default();
        assert_eq!(config.task, "default");
        assert_eq!(config.seen_movies, SeenMoviesConfig::default());
        assert!(config.reject_titles.is_empty());
        assert!(config.database_path.ends_with("seen.db"));
    }

    #[test]
    fn test_parse_full_file() {
        let config = SeengateConfig::parse(
            r#"
task = "movies"
database_path = "/tmp/seen.db"
seen_movies = "strict"

[filters]
reject_titles = ["CAM", "TS"]

[logging]
format = "json"
level = "debug"
"#,
        )
        .unwrap();

        assert_eq!(config.task, "movies");
        assert_eq!(config.database_path, PathBuf::from("/tmp/seen.db"));
        assert!(config.seen_movies.normalize().is_strict());
        assert_eq!(config.reject_titles, vec!["CAM", "TS"]);
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_parse_seen_movies_table() {
        let config = SeengateConfig::parse(
            r#"
[seen_movies]
scope = "local"
"#,
        )
        .unwrap();

        assert_eq!(
            config.seen_movies.normalize(),
            SeenMoviesOptions::default().with_scope(ScopeSetting::Local)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_seen_movies_key() {
        let result = SeengateConfig::parse(
            r#"
[seen_movies]
matching = "strict"
remember_rejected = true
"#,
        );
        assert!(matches!(result, Err(crate::Error::InvalidInput(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "task = \"tv\"\n").unwrap();

        let config = SeengateConfig::load_from_file(&path).unwrap();
        assert_eq!(config.task, "tv");
    }

    #[test]
    fn test_load_missing_file() {
        let result = SeengateConfig::load_from_file(Path::new("/nonexistent/seengate.toml"));
        assert!(matches!(
            result,
            Err(crate::Error::OperationFailed { ref operation, .. }) if operation == "read_config_file"
        ));
    }

    #[test]
    fn test_builders() {
        let config = SeengateConfig::new()
            .with_task("movies")
            .with_database_path("/var/lib/seen.db");
        assert_eq!(config.task, "movies");
        assert_eq!(config.database_path, PathBuf::from("/var/lib/seen.db"));
    }
}
