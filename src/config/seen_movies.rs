//! `seen_movies` stage configuration.
//!
//! Accepts either a bare matching token or a table:
//!
//! ```toml
//! seen_movies = "strict"
//!
//! # or
//! [seen_movies]
//! matching = "loose"
//! scope = "local"
//! ```
//!
//! Any other key is rejected.

use crate::models::SeenScope;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Matching {
    /// Items without any recognized identifier are rejected.
    Strict,
    /// Items without identifiers pass through untouched.
    #[default]
    Loose,
}

impl Matching {
    /// Returns the token as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Loose => "loose",
        }
    }

    /// Parses a matching token.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "loose" => Some(Self::Loose),
            _ => None,
        }
    }
}

impl fmt::Display for Matching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configured memory scope, before it is bound to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeSetting {
    /// Seen records are shared by every task.
    #[default]
    Global,
    /// Seen records are partitioned per task.
    Local,
}

impl ScopeSetting {
    /// Returns the token as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Local => "local",
        }
    }

    /// Parses a scope token.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "global" => Some(Self::Global),
            "local" => Some(Self::Local),
            _ => None,
        }
    }

    /// Binds the setting to a task, producing the storage scope.
    #[must_use]
    pub fn resolve(self, task: &str) -> SeenScope {
        match self {
            Self::Global => SeenScope::Global,
            Self::Local => SeenScope::local(task),
        }
    }
}

impl fmt::Display for ScopeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured `seen_movies` options.
///
/// Unset fields fall back at evaluation time: matching behaves as loose and
/// scope comes from the record store's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeenMoviesOptions {
    /// Memory scope.
    pub scope: Option<ScopeSetting>,
    /// Identifier strictness.
    pub matching: Option<Matching>,
}

impl SeenMoviesOptions {
    /// Returns true if strict matching was requested.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.matching == Some(Matching::Strict)
    }

    /// Builder method to set the matching mode.
    #[must_use]
    pub const fn with_matching(mut self, matching: Matching) -> Self {
        self.matching = Some(matching);
        self
    }

    /// Builder method to set the scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: ScopeSetting) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// Raw `seen_movies` configuration as written by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeenMoviesConfig {
    /// Bare matching token, e.g. `"strict"`.
    Matching(Matching),
    /// Structured options.
    Options(SeenMoviesOptions),
}

impl SeenMoviesConfig {
    /// Normalizes to structured options.
    ///
    /// A bare token becomes `{ matching: token }` with the scope left unset.
    #[must_use]
    pub fn normalize(&self) -> SeenMoviesOptions {
        match *self {
            Self::Matching(matching) => SeenMoviesOptions {
                scope: None,
                matching: Some(matching),
            },
            Self::Options(options) => options,
        }
    }

    /// Parses the configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the value is neither a matching token
    /// nor an options object with only `scope` and `matching`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::InvalidInput(format!("invalid seen_movies configuration: {e}"))
        })
    }
}

impl Default for SeenMoviesConfig {
    fn default() -> Self {
        Self::Options(SeenMoviesOptions::default())
    }
}

impl From<SeenMoviesOptions> for SeenMoviesConfig {
    fn from(options: SeenMoviesOptions) -> Self {
        Self::Options(options)
    }
}
