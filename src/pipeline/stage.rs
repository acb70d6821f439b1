//! Filter stage contract.

use super::Run;
use crate::Result;

/// Priority given to stages that do not care where they run.
pub const DEFAULT_PRIORITY: i32 = 128;

/// A named filter stage in the pipeline.
///
/// Stages run in descending [`priority`](FilterStage::priority) order. A
/// stage that must observe every other stage's decisions registers with the
/// lowest priority.
pub trait FilterStage: Send + Sync {
    /// Stage name, recorded on items the stage settles.
    fn name(&self) -> &str;

    /// Execution priority. Higher runs earlier.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Accepts or rejects items of the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage cannot reach a collaborator it depends
    /// on. The pipeline aborts the run.
    fn filter(&self, run: &mut Run) -> Result<()>;

    /// Terminal bookkeeping, called once every stage has filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage cannot persist what it learned.
    fn learn(&self, _run: &Run) -> Result<()> {
        Ok(())
    }
}
