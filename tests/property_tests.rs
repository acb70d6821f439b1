//! Property-based tests for the seen-movies filter.
//!
//! Uses proptest to verify invariants across random runs:
//! - First occurrence of an identifier wins within a run
//! - Accepted items never share an identifier value
//! - Evaluating a run twice changes nothing the second time
//! - Rejections are never reverted

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use seengate::config::{Matching, SeenMoviesConfig};
use seengate::models::{IdentifierKind, Item};
use seengate::pipeline::Run;
use seengate::services::SeenMoviesFilter;
use seengate::storage::InMemorySeenStore;
use std::collections::HashSet;
use std::sync::Arc;

/// Small value pools so collisions are frequent.
fn movie() -> impl Strategy<Value = (Option<u8>, Option<u8>)> {
    (proptest::option::of(0u8..6), proptest::option::of(0u8..6))
}

fn build_items(movies: &[(Option<u8>, Option<u8>)]) -> Vec<Item> {
    movies
        .iter()
        .enumerate()
        .map(|(i, (imdb, tmdb))| {
            let mut item = Item::new(format!("movie {i}"));
            if let Some(imdb) = imdb {
                item.set_field("imdb_id", format!("tt{imdb}"));
            }
            if let Some(tmdb) = tmdb {
                item.set_field("tmdb_id", i64::from(*tmdb));
            }
            item.accept("accept_all", "accepted");
            item
        })
        .collect()
}

fn filter(matching: Matching) -> SeenMoviesFilter {
    SeenMoviesFilter::new(
        &SeenMoviesConfig::Matching(matching),
        Arc::new(InMemorySeenStore::new()),
    )
}

fn matching() -> impl Strategy<Value = Matching> {
    prop_oneof![Just(Matching::Strict), Just(Matching::Loose)]
}

proptest! {
    /// Property: no two accepted items share a value of the same kind.
    #[test]
    fn prop_accepted_identifiers_are_unique(
        movies in prop::collection::vec(movie(), 0..20),
        matching in matching(),
    ) {
        let mut run = Run::new("movies", build_items(&movies));
        filter(matching).evaluate(&mut run).unwrap();

        for kind in [IdentifierKind::IMDB, IdentifierKind::TMDB] {
            let mut seen = HashSet::new();
            for item in run.accepted() {
                if let Some(value) = item.identifier(&kind) {
                    prop_assert!(seen.insert(value));
                }
            }
        }
    }

    /// Property: the first item carrying an identifier is never a same-run duplicate.
    #[test]
    fn prop_first_occurrence_wins(movies in prop::collection::vec(movie(), 1..20)) {
        let mut run = Run::new("movies", build_items(&movies));
        filter(Matching::Loose).evaluate(&mut run).unwrap();

        prop_assert!(run.items()[0].is_accepted());
        for (i, item) in run.items().iter().enumerate() {
            if item.is_rejected() {
                // Values of an item rejected mid-way stay claimed, so any
                // earlier item counts.
                let collides = run.items()[..i].iter().any(|earlier| {
                    [IdentifierKind::IMDB, IdentifierKind::TMDB].iter().any(|kind| {
                        item.identifier(kind).is_some()
                            && item.identifier(kind) == earlier.identifier(kind)
                    })
                });
                prop_assert!(collides, "item {} rejected without an earlier collision", i);
            }
        }
    }

    /// Property: a second evaluation of the same run changes nothing.
    #[test]
    fn prop_evaluate_is_idempotent(
        movies in prop::collection::vec(movie(), 0..20),
        matching in matching(),
    ) {
        let filter = filter(matching);
        let mut run = Run::new("movies", build_items(&movies));

        filter.evaluate(&mut run).unwrap();
        let once = run.clone();
        filter.evaluate(&mut run).unwrap();

        prop_assert_eq!(run, once);
    }

    /// Property: strict matching rejects exactly the items without identifiers
    /// on top of what loose matching rejects.
    #[test]
    fn prop_strict_only_adds_missing_identifier_rejections(
        movies in prop::collection::vec(movie(), 0..20),
    ) {
        let mut loose = Run::new("movies", build_items(&movies));
        filter(Matching::Loose).evaluate(&mut loose).unwrap();
        let mut strict = Run::new("movies", build_items(&movies));
        filter(Matching::Strict).evaluate(&mut strict).unwrap();

        for ((ids, l), s) in movies.iter().zip(loose.items()).zip(strict.items()) {
            if ids.0.is_none() && ids.1.is_none() {
                prop_assert!(s.is_rejected());
                prop_assert!(l.is_accepted());
            } else {
                prop_assert_eq!(l.status(), s.status());
            }
        }
    }
}
