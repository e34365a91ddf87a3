use std::sync::{Arc, PoisonError, RwLock};

use super::{Registry, RegistryError};
use crate::workflows::owner_applications::domain::{Question, Rule};

/// Copy-on-write handle shared between the settings surface and evaluators.
///
/// Readers receive an immutable snapshot; writers clone the current registry,
/// apply the change, and swap the result in only when it succeeds.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    current: Arc<RwLock<Arc<Registry>>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    pub fn snapshot(&self) -> Arc<Registry> {
        // The guarded value is only ever replaced wholesale, so a poisoned lock
        // still holds a consistent registry.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn mutate<T, F>(&self, change: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&mut Registry) -> Result<T, RegistryError>,
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Registry::clone(&guard);
        let output = change(&mut next)?;
        *guard = Arc::new(next);
        Ok(output)
    }

    pub fn replace(&self, registry: Registry) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(registry);
    }

    pub fn add_question(&self, question: Question) -> Result<(), RegistryError> {
        self.mutate(|registry| registry.add_question(question))
    }

    pub fn update_question(&self, question: Question) -> Result<(), RegistryError> {
        self.mutate(|registry| registry.update_question(question))
    }

    pub fn remove_question(&self, id: &str) -> Result<Question, RegistryError> {
        self.mutate(|registry| registry.remove_question(id))
    }

    pub fn add_rule(&self, rule: Rule) -> Result<(), RegistryError> {
        self.mutate(|registry| registry.add_rule(rule))
    }

    pub fn update_rule(&self, rule: Rule) -> Result<(), RegistryError> {
        self.mutate(|registry| registry.update_rule(rule))
    }

    pub fn remove_rule(&self, id: &str) -> Result<Rule, RegistryError> {
        self.mutate(|registry| registry.remove_rule(id))
    }
}

impl From<Registry> for SharedRegistry {
    fn from(registry: Registry) -> Self {
        Self::new(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::owner_applications::domain::{QuestionKind, RuleOperator};

    #[test]
    fn snapshots_are_isolated_from_later_writes() {
        let shared = SharedRegistry::default();
        shared
            .add_question(Question::new("q1", "Owns property", QuestionKind::Boolean, 1.0))
            .expect("question added");

        let before = shared.snapshot();
        shared
            .add_rule(Rule::new(
                "r1",
                "Too far",
                "distance",
                RuleOperator::GreaterThan,
                30,
            ))
            .expect("rule added");

        assert_eq!(before.rule_count(), 0);
        assert_eq!(shared.snapshot().rule_count(), 1);
        assert_eq!(shared.snapshot().question_count(), 1);
    }

    #[test]
    fn failed_mutation_leaves_registry_untouched() {
        let shared = SharedRegistry::default();
        shared
            .add_question(Question::new("q1", "Owns property", QuestionKind::Boolean, 1.0))
            .expect("question added");

        let result = shared.mutate(|registry| {
            registry.add_question(Question::new("q2", "Units", QuestionKind::Number, 1.0))?;
            registry.remove_question("missing")
        });

        assert!(matches!(result, Err(RegistryError::NotFound { .. })));
        assert!(shared.snapshot().question("q2").is_none());
    }

    #[test]
    fn clones_share_the_same_registry() {
        let shared = SharedRegistry::default();
        let settings_handle = shared.clone();
        settings_handle
            .add_question(Question::new("q1", "Owns property", QuestionKind::Boolean, 1.0))
            .expect("question added");

        assert!(shared.snapshot().question("q1").is_some());
    }
}
