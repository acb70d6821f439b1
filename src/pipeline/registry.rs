//! Priority-ordered stage registry.

use super::FilterStage;

/// Explicit, ordered list of filter stages.
///
/// Stages are kept sorted by descending priority. Stages with equal priority
/// keep their registration order.
#[derive(Default)]
pub struct StageRegistry {
    stages: Vec<Box<dyn FilterStage>>,
}

impl StageRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stage at its priority position.
    pub fn register(&mut self, stage: Box<dyn FilterStage>) {
        let priority = stage.priority();
        let position = self
            .stages
            .iter()
            .position(|existing| existing.priority() < priority)
            .unwrap_or(self.stages.len());

        tracing::debug!(
            stage = stage.name(),
            priority = priority,
            position = position,
            "Registered filter stage"
        );
        self.stages.insert(position, stage);
    }

    /// Iterates stages in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn FilterStage + 'static)> {
        self.stages.iter().map(|stage| &**stage)
    }

    /// Returns stage names in execution order.
    #[must_use]
    pub fn ordered_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Returns the execution position of a stage.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|stage| stage.name() == name)
    }

    /// Returns the number of registered stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if no stage is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl std::fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRegistry")
            .field("stages", &self.ordered_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::pipeline::Run;

    struct Named(&'static str, i32);

    impl FilterStage for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn priority(&self) -> i32 {
            self.1
        }

        fn filter(&self, _run: &mut Run) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sorted_by_descending_priority() {
        let mut registry = StageRegistry::new();
        registry.register(Box::new(Named("last", -255)));
        registry.register(Box::new(Named("middle", 0)));
        registry.register(Box::new(Named("first", 255)));

        assert_eq!(registry.ordered_names(), vec!["first", "middle", "last"]);
        assert_eq!(registry.position("last"), Some(2));
        assert_eq!(registry.position("missing"), None);
    }

    #[test]
    fn test_equal_priority_keeps_registration_order() {
        let mut registry = StageRegistry::new();
        registry.register(Box::new(Named("a", 10)));
        registry.register(Box::new(Named("b", 10)));
        registry.register(Box::new(Named("c", 20)));
        registry.register(Box::new(Named("d", 10)));

        assert_eq!(registry.ordered_names(), vec!["c", "a", "b", "d"]);
        assert_eq!(registry.len(), 4);
        assert!(!registry.is_empty());
    }
}
