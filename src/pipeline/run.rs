//! Run state and summaries.

use crate::models::{Item, ItemStatus};
use serde::Serialize;

/// One execution of the pipeline over a batch of candidate items.
///
/// Item order is the input order and is never changed by the pipeline; it
/// decides which of two same-run duplicates survives.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    task: String,
    items: Vec<Item>,
}

impl Run {
    /// Creates a run for the named task.
    #[must_use]
    pub fn new(task: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            task: task.into(),
            items,
        }
    }

    /// Returns the task name.
    #[must_use]
    pub fn task(&self) -> &str {
        &self.task
    }

    /// Returns the items in input order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the items mutably, in input order.
    pub fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    /// Iterates accepted items in input order.
    pub fn accepted(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_accepted())
    }

    /// Iterates rejected items in input order.
    pub fn rejected(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_rejected())
    }

    /// Consumes the run, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

/// Final decision on one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDecision {
    /// Item title.
    pub title: String,
    /// Final status.
    pub status: ItemStatus,
    /// Reason attached by the deciding stage.
    pub reason: Option<String>,
    /// Stage that settled the item.
    pub stage: Option<String>,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Task name.
    pub task: String,
    /// Number of accepted items.
    pub accepted: usize,
    /// Number of rejected items.
    pub rejected: usize,
    /// Number of items no stage settled.
    pub undecided: usize,
    /// Per-item decisions in input order.
    pub decisions: Vec<ItemDecision>,
}

impl RunSummary {
    /// Summarizes the current state of a run.
    #[must_use]
    pub fn from_run(run: &Run) -> Self {
        let decisions: Vec<ItemDecision> = run
            .items()
            .iter()
            .map(|item| ItemDecision {
                title: item.title().to_string(),
                status: item.status(),
                reason: item.reason().map(str::to_string),
                stage: item.decided_by().map(str::to_string),
            })
            .collect();

        let count = |status: ItemStatus| decisions.iter().filter(|d| d.status == status).count();

        Self {
            task: run.task().to_string(),
            accepted: count(ItemStatus::Accepted),
            rejected: count(ItemStatus::Rejected),
            undecided: count(ItemStatus::Undecided),
            decisions,
        }
    }
}
