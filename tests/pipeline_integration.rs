//! End-to-end pipeline tests for the seen-movies filter.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::doc_markdown)]

use seengate::config::{Matching, ScopeSetting, SeenMoviesConfig, SeenMoviesOptions};
use seengate::models::{IdentifierKind, Item, SeenRecord, SeenScope};
use seengate::pipeline::{AcceptAll, FilterStage, Pipeline, RejectTitles, Run};
use seengate::services::SeenMoviesFilter;
use seengate::storage::{InMemorySeenStore, SeenRecordStore, SqliteSeenStore};
use std::sync::Arc;
use tempfile::TempDir;

fn pipeline(config: &SeenMoviesConfig, store: Arc<dyn SeenRecordStore>) -> Pipeline {
    Pipeline::builder()
        .stage(SeenMoviesFilter::new(config, store))
        .stage(RejectTitles::new(["cam"]))
        .stage(AcceptAll)
        .build()
}

fn items(json: &str) -> Vec<Item> {
    seengate::cli::parse_items(json).unwrap()
}

#[test]
fn test_seen_movies_runs_after_every_other_stage() {
    let pipeline = pipeline(
        &SeenMoviesConfig::default(),
        Arc::new(InMemorySeenStore::new()),
    );
    let names = pipeline.registry().ordered_names();

    assert_eq!(names.last(), Some(&"seen_movies"));
    assert_eq!(
        pipeline.registry().position("seen_movies"),
        Some(pipeline.registry().len() - 1)
    );
    let lowest_other = pipeline
        .registry()
        .iter()
        .filter(|stage| stage.name() != "seen_movies")
        .map(|stage| stage.priority())
        .min()
        .unwrap();
    assert!(lowest_other > -255);
}

#[test]
fn test_strict_rejects_item_without_identifiers() {
    let config = SeenMoviesConfig::from_json(r#""strict""#).unwrap();
    let pipeline = pipeline(&config, Arc::new(InMemorySeenStore::new()));
    let mut run = Run::new("movies", items(r#"[{"title": "X"}]"#));

    let summary = pipeline.execute(&mut run).unwrap();

    assert_eq!(summary.rejected, 1);
    let reason = run.items()[0].reason().unwrap();
    assert!(reason.contains("missing movie (imdb or tmdb) id"));
}

#[test]
fn test_loose_rejects_previously_seen_movie() {
    let store = Arc::new(InMemorySeenStore::new());
    store
        .record(&SeenRecord::new(
            IdentifierKind::IMDB,
            "tt1",
            SeenScope::Global,
            "Heat",
            "yesterday",
        ))
        .unwrap();
    let config = SeenMoviesConfig::from_json(r#"{"matching": "loose"}"#).unwrap();
    let pipeline = pipeline(&config, store);
    let mut run = Run::new("movies", items(r#"[{"title": "Heat", "imdb_id": "tt1"}]"#));

    pipeline.execute(&mut run).unwrap();

    let item = &run.items()[0];
    assert!(item.is_rejected());
    assert_eq!(
        item.reason(),
        Some("already seen: imdb_id `tt1` was accepted in task yesterday")
    );
}

#[test]
fn test_same_run_duplicate_rejected_first_accepted() {
    let config = SeenMoviesConfig::from_json(r#"{"matching": "loose"}"#).unwrap();
    let pipeline = pipeline(&config, Arc::new(InMemorySeenStore::new()));
    let mut run = Run::new(
        "movies",
        items(r#"[{"title": "Heat", "imdb_id": "tt1"}, {"title": "Heat REPACK", "imdb_id": "tt1"}]"#),
    );

    pipeline.execute(&mut run).unwrap();

    assert!(run.items()[0].is_accepted());
    assert!(run.items()[1].is_rejected());
    assert_eq!(run.items()[1].reason(), Some("already accepted once in task"));
}

#[test]
fn test_distinct_kinds_and_values_both_accepted() {
    let pipeline = pipeline(
        &SeenMoviesConfig::default(),
        Arc::new(InMemorySeenStore::new()),
    );
    let mut run = Run::new(
        "movies",
        items(r#"[{"title": "Heat", "imdb_id": "tt1"}, {"title": "Ronin", "tmdb_id": "55"}]"#),
    );

    let summary = pipeline.execute(&mut run).unwrap();

    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.rejected, 0);
}

#[test]
fn test_upstream_rejection_is_not_overwritten() {
    let pipeline = pipeline(
        &SeenMoviesConfig::Matching(Matching::Strict),
        Arc::new(InMemorySeenStore::new()),
    );
    let mut run = Run::new("movies", items(r#"[{"title": "Heat CAM"}]"#));

    pipeline.execute(&mut run).unwrap();

    assert_eq!(run.items()[0].decided_by(), Some("reject_titles"));
}

#[test]
fn test_numeric_and_text_identifiers_collide() {
    let pipeline = pipeline(
        &SeenMoviesConfig::default(),
        Arc::new(InMemorySeenStore::new()),
    );
    let mut run = Run::new(
        "movies",
        items(r#"[{"title": "a", "tmdb_id": 55}, {"title": "b", "tmdb_id": "55"}]"#),
    );

    pipeline.execute(&mut run).unwrap();

    assert!(run.items()[0].is_accepted());
    assert!(run.items()[1].is_rejected());
}

#[test]
fn test_sqlite_memory_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seen.db");
    let config = SeenMoviesConfig::default();

    {
        let store = Arc::new(SqliteSeenStore::new(&path).unwrap());
        let mut run = Run::new("movies", items(r#"[{"title": "Heat", "imdb_id": "tt1"}]"#));
        let summary = pipeline(&config, store).execute(&mut run).unwrap();
        assert_eq!(summary.accepted, 1);
    }

    let store = Arc::new(SqliteSeenStore::new(&path).unwrap());
    let mut run = Run::new(
        "movies",
        items(r#"[{"title": "Heat again", "imdb_id": "tt1"}, {"title": "Ronin", "imdb_id": "tt2"}]"#),
    );
    pipeline(&config, store.clone()).execute(&mut run).unwrap();

    assert!(run.items()[0].is_rejected());
    assert!(run.items()[1].is_accepted());
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn test_dry_run_leaves_store_untouched() {
    let store = Arc::new(InMemorySeenStore::new());
    let dry = Pipeline::builder()
        .stage(AcceptAll)
        .stage(SeenMoviesFilter::new(&SeenMoviesConfig::default(), store.clone()))
        .learn(false)
        .build();
    let mut run = Run::new("movies", items(r#"[{"title": "Heat", "imdb_id": "tt1"}]"#));

    dry.execute(&mut run).unwrap();

    assert!(run.items()[0].is_accepted());
    assert!(store.is_empty());
}

#[test]
fn test_local_scope_isolates_tasks() {
    let store: Arc<dyn SeenRecordStore> = Arc::new(InMemorySeenStore::new());
    let config: SeenMoviesConfig = SeenMoviesOptions::default()
        .with_scope(ScopeSetting::Local)
        .into();
    let heat = r#"[{"title": "Heat", "imdb_id": "tt1"}]"#;

    let mut hd = Run::new("hd", items(heat));
    pipeline(&config, store.clone()).execute(&mut hd).unwrap();

    let mut sd = Run::new("sd", items(heat));
    pipeline(&config, store.clone()).execute(&mut sd).unwrap();
    assert!(sd.items()[0].is_accepted());

    let mut hd_again = Run::new("hd", items(heat));
    pipeline(&config, store.clone()).execute(&mut hd_again).unwrap();
    assert!(hd_again.items()[0].is_rejected());

    // Local records never satisfy a global lookup.
    assert!(
        !store
            .is_seen(&IdentifierKind::IMDB, "tt1", &SeenScope::Global)
            .unwrap()
    );
}

#[test]
fn test_forget_makes_movie_acceptable_again() {
    let store = Arc::new(InMemorySeenStore::new());
    let config = SeenMoviesConfig::default();
    let heat = r#"[{"title": "Heat", "imdb_id": "tt1", "tmdb_id": 949}]"#;

    let mut first = Run::new("movies", items(heat));
    pipeline(&config, store.clone()).execute(&mut first).unwrap();
    assert_eq!(store.len(), 2);

    assert_eq!(store.forget("Heat").unwrap(), 2);

    let mut second = Run::new("movies", items(heat));
    pipeline(&config, store.clone()).execute(&mut second).unwrap();
    assert!(second.items()[0].is_accepted());
}

#[test]
fn test_empty_identifier_counts_as_present() {
    let config = SeenMoviesConfig::Matching(Matching::Strict);
    let pipeline = pipeline(&config, Arc::new(InMemorySeenStore::new()));
    let mut run = Run::new(
        "movies",
        items(r#"[{"title": "X", "imdb_id": ""}, {"title": "Y", "imdb_id": ""}]"#),
    );

    pipeline.execute(&mut run).unwrap();

    assert!(run.items()[0].is_accepted());
    assert_eq!(run.items()[1].reason(), Some("already accepted once in task"));
}

#[test]
fn test_large_numeric_identifiers_stay_distinct() {
    let pipeline = pipeline(
        &SeenMoviesConfig::default(),
        Arc::new(InMemorySeenStore::new()),
    );
    let mut run = Run::new(
        "movies",
        items(
            r#"[{"title": "a", "tmdb_id": 18446744073709551615},
                {"title": "b", "tmdb_id": 18446744073709551614}]"#,
        ),
    );

    let summary = pipeline.execute(&mut run).unwrap();

    assert_eq!(summary.accepted, 2);
}
