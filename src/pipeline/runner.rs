//! Pipeline execution.

use super::{FilterStage, Run, RunSummary, StageRegistry};
use crate::Result;
use tracing::instrument;

/// A sequential filter pipeline.
///
/// Executes every registered stage's filter phase in priority order, then,
/// unless learning is disabled, every stage's learn phase.
#[derive(Debug)]
pub struct Pipeline {
    registry: StageRegistry,
    learn: bool,
}

/// Builder for [`Pipeline`].
#[derive(Debug)]
pub struct PipelineBuilder {
    registry: StageRegistry,
    learn: bool,
}

impl PipelineBuilder {
    /// Adds a stage.
    #[must_use]
    pub fn stage(mut self, stage: impl FilterStage + 'static) -> Self {
        self.registry.register(Box::new(stage));
        self
    }

    /// Adds a boxed stage.
    #[must_use]
    pub fn boxed_stage(mut self, stage: Box<dyn FilterStage>) -> Self {
        self.registry.register(stage);
        self
    }

    /// Enables or disables the learn phase (dry run when disabled).
    #[must_use]
    pub const fn learn(mut self, learn: bool) -> Self {
        self.learn = learn;
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            registry: self.registry,
            learn: self.learn,
        }
    }
}

impl Pipeline {
    /// Starts building a pipeline with learning enabled.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder {
            registry: StageRegistry::new(),
            learn: true,
        }
    }

    /// Returns the stage registry.
    #[must_use]
    pub const fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    /// Executes the pipeline over a run.
    ///
    /// # Errors
    ///
    /// Returns the first stage error; the run is aborted and nothing further
    /// is learned.
    #[instrument(skip_all, fields(task = %run.task(), items = run.items().len()))]
    pub fn execute(&self, run: &mut Run) -> Result<RunSummary> {
        for stage in self.registry.iter() {
            tracing::debug!(stage = stage.name(), "Running filter phase");
            stage.filter(run)?;
        }

        if self.learn {
            for stage in self.registry.iter() {
                stage.learn(run)?;
            }
        }

        let summary = RunSummary::from_run(run);
        tracing::info!(
            accepted = summary.accepted,
            rejected = summary.rejected,
            undecided = summary.undecided,
            "Run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::models::Item;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        name: &'static str,
        priority: i32,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl FilterStage for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn filter(&self, _run: &mut Run) -> Result<()> {
            self.log.lock().unwrap().push(format!("filter:{}", self.name));
            if self.fail {
                return Err(Error::OperationFailed {
                    operation: "filter".to_string(),
                    cause: "boom".to_string(),
                });
            }
            Ok(())
        }

        fn learn(&self, _run: &Run) -> Result<()> {
            self.log.lock().unwrap().push(format!("learn:{}", self.name));
            Ok(())
        }
    }

    fn recorder(name: &'static str, priority: i32, log: &Arc<Mutex<Vec<String>>>) -> Recorder {
        Recorder {
            name,
            priority,
            log: Arc::clone(log),
            fail: false,
        }
    }

    #[test]
    fn test_filter_then_learn_in_priority_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .stage(recorder("late", -10, &log))
            .stage(recorder("early", 10, &log))
            .build();

        let mut run = Run::new("t", vec![Item::new("a")]);
        pipeline.execute(&mut run).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["filter:early", "filter:late", "learn:early", "learn:late"]
        );
    }

    #[test]
    fn test_dry_run_skips_learn() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .stage(recorder("only", 0, &log))
            .learn(false)
            .build();

        pipeline.execute(&mut Run::new("t", Vec::new())).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["filter:only"]);
    }

    #[test]
    fn test_stage_error_aborts_run() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut failing = recorder("failing", 10, &log);
        failing.fail = true;
        let pipeline = Pipeline::builder()
            .stage(failing)
            .stage(recorder("after", 0, &log))
            .build();

        let result = pipeline.execute(&mut Run::new("t", Vec::new()));
        assert!(result.is_err());
        assert_eq!(*log.lock().unwrap(), vec!["filter:failing"]);
    }
}
