//! The `seen_movies` stage.

use crate::Result;
use crate::config::SeenMoviesConfig;
use crate::models::IdentifierKind;
use crate::pipeline::{FilterStage, Run};
use crate::storage::SeenRecordStore;
use std::sync::Arc;

use super::seen_filter::SeenFilter;
use super::types::AnyIdentifier;

/// Stage name.
pub const SEEN_MOVIES_STAGE: &str = "seen_movies";

/// Stage priority. Lowest of all filter stages, so the same-run check sees
/// every other stage's decisions.
pub const SEEN_MOVIES_PRIORITY: i32 = -255;

/// What strict matching requires, as reported in rejection reasons.
pub const MOVIE_IDENTIFIER_DESCRIPTION: &str = "movie (imdb or tmdb) id";

/// Identifier kinds checked by the stage, in checking order.
#[must_use]
pub fn movie_identifier_kinds() -> Vec<IdentifierKind> {
    vec![IdentifierKind::IMDB, IdentifierKind::TMDB]
}

/// Prevents the same movie from being accepted twice.
///
/// Recognizes movies by `imdb_id` and `tmdb_id`. Rejects an item when either
/// identifier was accepted by an earlier run (under the configured scope) or
/// by an earlier item of the same run. With `matching = "strict"`, items
/// carrying neither identifier are rejected outright.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use seengate::config::SeenMoviesConfig;
/// use seengate::models::Item;
/// use seengate::pipeline::Run;
/// use seengate::services::SeenMoviesFilter;
/// use seengate::storage::InMemorySeenStore;
///
/// let config = SeenMoviesConfig::from_json(r#""strict""#).unwrap();
/// let filter = SeenMoviesFilter::new(&config, Arc::new(InMemorySeenStore::new()));
///
/// let mut run = Run::new("movies", vec![Item::new("Untitled")]);
/// filter.evaluate(&mut run).unwrap();
/// assert_eq!(
///     run.items()[0].reason(),
///     Some("missing movie (imdb or tmdb) id, strict")
/// );
/// ```
#[derive(Debug)]
pub struct SeenMoviesFilter {
    inner: SeenFilter,
}

impl SeenMoviesFilter {
    /// Creates the stage from its raw configuration.
    #[must_use]
    pub fn new(config: &SeenMoviesConfig, store: Arc<dyn SeenRecordStore>) -> Self {
        let options = config.normalize();

        let mut inner = SeenFilter::new(SEEN_MOVIES_STAGE, movie_identifier_kinds(), store)
            .with_priority(SEEN_MOVIES_PRIORITY);
        if let Some(scope) = options.scope {
            inner = inner.with_scope(scope);
        }
        if options.is_strict() {
            inner = inner.with_presence(AnyIdentifier::new(MOVIE_IDENTIFIER_DESCRIPTION));
        }

        Self { inner }
    }

    /// Rejects duplicate movies in the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store cannot be queried.
    pub fn evaluate(&self, run: &mut Run) -> Result<()> {
        self.inner.evaluate(run)
    }

    /// Returns the underlying generic filter.
    #[must_use]
    pub const fn inner(&self) -> &SeenFilter {
        &self.inner
    }
}

impl FilterStage for SeenMoviesFilter {
    fn name(&self) -> &str {
        SEEN_MOVIES_STAGE
    }

    fn priority(&self) -> i32 {
        SEEN_MOVIES_PRIORITY
    }

    fn filter(&self, run: &mut Run) -> Result<()> {
        self.evaluate(run)
    }

    fn learn(&self, run: &Run) -> Result<()> {
        self.inner.record_accepted(run).map(|_| ())
    }
}
