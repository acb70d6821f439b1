//! Generic cross-run and same-run duplicate filter.

use crate::Result;
use crate::config::ScopeSetting;
use crate::models::{IdentifierKind, Item, SeenRecord, SeenScope};
use crate::pipeline::{FilterStage, Run};
use crate::storage::SeenRecordStore;
use std::sync::Arc;
use tracing::instrument;

use super::run_sets::RunDuplicateSets;
use super::types::{PresencePolicy, RejectReason};

/// Priority of a plain seen filter: early, so known items are dropped before
/// other stages spend time on them.
pub const SEEN_FILTER_PRIORITY: i32 = 255;

/// Duplicate filter over a list of identifier kinds.
///
/// Evaluation runs three phases over the run's items, in input order:
///
/// 1. **Presence** (strict only): non-rejected items failing the
///    [`PresencePolicy`] are rejected. Runs first so those items never reach
///    the store.
/// 2. **Cross-run**: non-rejected items with any identifier the store has
///    seen under the filter's scope are rejected.
/// 3. **Same-run**: accepted items whose identifier collides with an earlier
///    accepted item are rejected; the first one wins.
///
/// Nothing is recorded during evaluation. Accepted identifiers are written to
/// the store by [`SeenFilter::record_accepted`] once the run's decisions are final.
pub struct SeenFilter {
    name: String,
    priority: i32,
    kinds: Vec<IdentifierKind>,
    presence: Option<Box<dyn PresencePolicy>>,
    scope: ScopeSetting,
    store: Arc<dyn SeenRecordStore>,
}

impl SeenFilter {
    /// Creates a loose filter using the store's default scope.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kinds: Vec<IdentifierKind>,
        store: Arc<dyn SeenRecordStore>,
    ) -> Self {
        let scope = store.default_scope();
        Self {
            name: name.into(),
            priority: SEEN_FILTER_PRIORITY,
            kinds,
            presence: None,
            scope,
            store,
        }
    }

    /// Builder method enabling strict matching with the given policy.
    #[must_use]
    pub fn with_presence(mut self, policy: impl PresencePolicy + 'static) -> Self {
        self.presence = Some(Box::new(policy));
        self
    }

    /// Builder method to set the scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: ScopeSetting) -> Self {
        self.scope = scope;
        self
    }

    /// Builder method to set the stage priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the identifier kinds, in checking order.
    #[must_use]
    pub fn kinds(&self) -> &[IdentifierKind] {
        &self.kinds
    }

    /// Returns the configured scope.
    #[must_use]
    pub const fn scope(&self) -> ScopeSetting {
        self.scope
    }

    /// Returns true if strict matching is enabled.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.presence.is_some()
    }

    /// Runs all three phases over a run.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried. Items rejected before
    /// the failure stay rejected; the caller is expected to abort the run.
    #[instrument(
        skip_all,
        fields(stage = %self.name, task = %run.task(), items = run.items().len(), strict = self.is_strict())
    )]
    pub fn evaluate(&self, run: &mut Run) -> Result<()> {
        let scope = self.scope.resolve(run.task());

        let missing = self.reject_missing_identifiers(run.items_mut());
        let prior = self.reject_prior_duplicates(&scope, run.items_mut())?;
        let same_run = self.reject_same_run_duplicates(run.items_mut());

        tracing::debug!(
            missing = missing,
            prior = prior,
            same_run = same_run,
            "Seen filter finished"
        );
        Ok(())
    }

    /// Phase 1: rejects items without a required identifier.
    ///
    /// Does nothing unless strict matching is enabled. Returns the number of
    /// items rejected.
    pub fn reject_missing_identifiers(&self, items: &mut [Item]) -> usize {
        let Some(policy) = self.presence.as_deref() else {
            return 0;
        };

        let mut rejected = 0;
        for item in items.iter_mut().filter(|item| !item.is_rejected()) {
            if policy.is_satisfied(item, &self.kinds) {
                continue;
            }
            tracing::info!(
                title = item.title(),
                "Rejecting {} because of missing {}",
                item.title(),
                policy.description()
            );
            let reason = RejectReason::MissingIdentifier {
                description: policy.description().to_string(),
            };
            self.reject(item, &reason);
            rejected += 1;
        }
        rejected
    }

    /// Phase 2: rejects items whose identifiers were recorded by earlier runs.
    ///
    /// Stops at the first matching identifier of each item. Returns the number
    /// of items rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    pub fn reject_prior_duplicates(&self, scope: &SeenScope, items: &mut [Item]) -> Result<usize> {
        let mut rejected = 0;
        for item in items.iter_mut().filter(|item| !item.is_rejected()) {
            if let Some(reason) = self.find_prior(scope, item)? {
                tracing::debug!(title = item.title(), reason = %reason, "Rejecting seen item");
                self.reject(item, &reason);
                rejected += 1;
            }
        }
        Ok(rejected)
    }

    fn find_prior(&self, scope: &SeenScope, item: &Item) -> Result<Option<RejectReason>> {
        for kind in &self.kinds {
            let Some(value) = item.identifier(kind) else {
                continue;
            };
            if let Some(record) = self.store.find(kind, &value, scope)? {
                return Ok(Some(RejectReason::PriorDuplicate {
                    kind: kind.clone(),
                    value,
                    task: record.task,
                }));
            }
        }
        Ok(None)
    }

    /// Phase 3: rejects accepted items that duplicate an earlier accepted item.
    ///
    /// Values of an item are added kind by kind; values added before a
    /// collision stay in the sets. Returns the number of items rejected.
    pub fn reject_same_run_duplicates(&self, items: &mut [Item]) -> usize {
        let mut seen = RunDuplicateSets::new(&self.kinds);
        let mut rejected = 0;

        for item in items.iter_mut().filter(|item| item.is_accepted()) {
            for kind in &self.kinds {
                let Some(value) = item.identifier(kind) else {
                    continue;
                };
                if !seen.insert(kind, value) {
                    tracing::debug!(title = item.title(), kind = %kind, "Rejecting same-run duplicate");
                    self.reject(item, &RejectReason::SameRunDuplicate);
                    rejected += 1;
                    break;
                }
            }
        }
        rejected
    }

    /// Records every identifier of every accepted item.
    ///
    /// Returns the number of new records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    #[instrument(skip_all, fields(stage = %self.name, task = %run.task()))]
    pub fn record_accepted(&self, run: &Run) -> Result<usize> {
        let scope = self.scope.resolve(run.task());
        let mut recorded = 0;

        for item in run.accepted() {
            for kind in &self.kinds {
                let Some(value) = item.identifier(kind) else {
                    continue;
                };
                let record =
                    SeenRecord::new(kind.clone(), value, scope.clone(), item.title(), run.task());
                if self.store.record(&record)? {
                    recorded += 1;
                }
            }
        }

        tracing::debug!(recorded = recorded, "Learned accepted identifiers");
        Ok(recorded)
    }

    fn reject(&self, item: &mut Item, reason: &RejectReason) {
        if item.reject(&self.name, reason.to_string()) {
            metrics::counter!(
                "seen_filter_rejections_total",
                "stage" => self.name.clone(),
                "reason" => reason.label()
            )
            .increment(1);
        }
    }
}

impl FilterStage for SeenFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn filter(&self, run: &mut Run) -> Result<()> {
        self.evaluate(run)
    }

    fn learn(&self, run: &Run) -> Result<()> {
        self.record_accepted(run).map(|_| ())
    }
}

impl std::fmt::Debug for SeenFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeenFilter")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("kinds", &self.kinds)
            .field("strict", &self.is_strict())
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
