//! Bundled upstream filter stages.

use super::{FilterStage, Run};
use crate::Result;

/// Accepts every undecided item. Runs first.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl FilterStage for AcceptAll {
    fn name(&self) -> &'static str {
        "accept_all"
    }

    fn priority(&self) -> i32 {
        255
    }

    fn filter(&self, run: &mut Run) -> Result<()> {
        for item in run.items_mut() {
            item.accept("accept_all", "accepted by accept_all");
        }
        Ok(())
    }
}

/// Rejects items whose title contains any of the configured substrings
/// (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct RejectTitles {
    patterns: Vec<String>,
}

impl RejectTitles {
    /// Creates the stage from title substrings.
    #[must_use]
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }
}

impl FilterStage for RejectTitles {
    fn name(&self) -> &'static str {
        "reject_titles"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn filter(&self, run: &mut Run) -> Result<()> {
        let lowered: Vec<String> = self.patterns.iter().map(|p| p.to_lowercase()).collect();

        for item in run.items_mut() {
            if item.is_rejected() {
                continue;
            }
            let title = item.title().to_lowercase();
            if let Some(pattern) = lowered.iter().find(|p| title.contains(p.as_str())) {
                let reason = format!("title matches `{pattern}`");
                item.reject("reject_titles", reason);
            }
        }
        Ok(())
    }
}
