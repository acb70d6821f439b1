//! Sequential filter pipeline.
//!
//! A [`Pipeline`] owns an explicit [`StageRegistry`] sorted by priority.
//! Each run goes through two phases:
//!
//! 1. **filter**: every stage accepts or rejects items, highest priority first
//! 2. **learn**: every stage persists what it needs from the final decisions
//!
//! The `seen_movies` stage registers with the lowest priority so its same-run
//! check observes every other stage's decisions, and records accepted items
//! only in the learn phase.

mod registry;
mod run;
mod runner;
mod stage;
mod stages;

pub use registry::StageRegistry;
pub use run::{ItemDecision, Run, RunSummary};
pub use runner::{Pipeline, PipelineBuilder};
pub use stage::{DEFAULT_PRIORITY, FilterStage};
pub use stages::{AcceptAll, RejectTitles};
