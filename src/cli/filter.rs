//! Filter CLI command.

use super::{OutputFormat, open_store};
use crate::config::{Matching, ScopeSetting, SeenMoviesConfig, SeengateConfig};
use crate::models::Item;
use crate::pipeline::{AcceptAll, Pipeline, RejectTitles, Run, RunSummary};
use crate::services::SeenMoviesFilter;
use crate::storage::SeenRecordStore;
use crate::{Error, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments of the `filter` command.
#[derive(Debug, Clone, Default)]
pub struct FilterArgs {
    /// JSON file holding an array of items.
    pub items_path: PathBuf,
    /// Overrides the configured task name.
    pub task: Option<String>,
    /// Overrides the configured matching mode.
    pub matching: Option<Matching>,
    /// Overrides the configured scope.
    pub scope: Option<ScopeSetting>,
    /// Evaluate only; record nothing.
    pub dry_run: bool,
    /// Output format.
    pub format: OutputFormat,
}

impl FilterArgs {
    /// Applies the command-line overrides to the stage configuration.
    #[must_use]
    pub fn seen_movies_config(&self, configured: &SeenMoviesConfig) -> SeenMoviesConfig {
        let mut options = configured.normalize();
        if let Some(matching) = self.matching {
            options = options.with_matching(matching);
        }
        if let Some(scope) = self.scope {
            options = options.with_scope(scope);
        }
        options.into()
    }
}

/// Parses items from a JSON array.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the document is not an array of item
/// objects.
pub fn parse_items(json: &str) -> Result<Vec<Item>> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| Error::InvalidInput(format!("items are not valid JSON: {e}")))?;
    let serde_json::Value::Array(entries) = value else {
        return Err(Error::InvalidInput(
            "items must be a JSON array of objects".to_string(),
        ));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            Item::from_json(entry)
                .map_err(|e| Error::InvalidInput(format!("item {index}: {e}")))
        })
        .collect()
}

/// Loads items from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "read_items".to_string(),
        cause: format!("{}: {}", path.display(), e),
    })?;
    parse_items(&contents)
}

/// Builds the filter pipeline.
///
/// Stages: `accept_all`, `reject_titles` when patterns are configured, and
/// `seen_movies` last.
#[must_use]
pub fn build_pipeline(
    config: &SeengateConfig,
    seen_movies: &SeenMoviesConfig,
    store: Arc<dyn SeenRecordStore>,
    learn: bool,
) -> Pipeline {
    let mut builder = Pipeline::builder().stage(AcceptAll).learn(learn);
    if !config.reject_titles.is_empty() {
        builder = builder.stage(RejectTitles::new(config.reject_titles.iter().cloned()));
    }
    builder.stage(SeenMoviesFilter::new(seen_movies, store)).build()
}

/// Runs the items through the pipeline and writes the decisions.
///
/// # Errors
///
/// Returns an error if a stage fails or output cannot be written.
pub fn run_filter<W: Write>(
    writer: &mut W,
    config: &SeengateConfig,
    store: Arc<dyn SeenRecordStore>,
    args: &FilterArgs,
    items: Vec<Item>,
) -> std::result::Result<RunSummary, Box<dyn std::error::Error>> {
    let task = args.task.as_deref().unwrap_or(&config.task);
    let seen_movies = args.seen_movies_config(&config.seen_movies);
    let pipeline = build_pipeline(config, &seen_movies, store, !args.dry_run);

    let mut run = Run::new(task, items);
    let summary = pipeline.execute(&mut run)?;

    match args.format {
        OutputFormat::Table => write_table(writer, &summary, args.dry_run)?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            writeln!(writer, "{json}")?;
        },
    }
    Ok(summary)
}

/// Writes a run summary as a table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table<W: Write>(writer: &mut W, summary: &RunSummary, dry_run: bool) -> io::Result<()> {
    writeln!(writer, "{:<10}{:<40}{:<16}REASON", "STATUS", "TITLE", "STAGE")?;
    for decision in &summary.decisions {
        writeln!(
            writer,
            "{:<10}{:<40}{:<16}{}",
            decision.status,
            decision.title,
            decision.stage.as_deref().unwrap_or("-"),
            decision.reason.as_deref().unwrap_or("")
        )?;
    }
    writeln!(writer)?;
    writeln!(
        writer,
        "Task {}: {} accepted, {} rejected, {} undecided{}",
        summary.task,
        summary.accepted,
        summary.rejected,
        summary.undecided,
        if dry_run { " (dry run, nothing recorded)" } else { "" }
    )
}

/// Executes the filter command against the configured database.
///
/// # Errors
///
/// Returns an error if the items cannot be loaded, the database cannot be
/// opened, or the pipeline fails.
pub fn cmd_filter(
    config: &SeengateConfig,
    args: &FilterArgs,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let items = load_items(&args.items_path)?;
    let store = Arc::new(open_store(config)?);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    run_filter(&mut handle, config, store, args, items)?;
    Ok(())
}
