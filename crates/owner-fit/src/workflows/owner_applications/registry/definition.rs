use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Registry, RegistryError};
use crate::workflows::owner_applications::domain::{
    FieldValue, Question, Rule, RuleId, RuleOperator,
};

/// Serialized registry layout as exported by the settings panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryDefinition {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// Rule as stored in a definition file; the operator is still a raw symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: String,
    pub label: String,
    pub field: String,
    pub operator: String,
    pub value: FieldValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl TryFrom<RuleDefinition> for Rule {
    type Error = RegistryError;

    fn try_from(definition: RuleDefinition) -> Result<Self, Self::Error> {
        let operator = RuleOperator::from_symbol(&definition.operator).ok_or_else(|| {
            RegistryError::InvalidRule {
                id: definition.id.clone(),
                reason: format!(
                    "unsupported operator '{}' (expected one of >, >=, <, <=, ==, !=)",
                    definition.operator
                ),
            }
        })?;

        Ok(Rule {
            id: RuleId(definition.id),
            label: definition.label,
            field: definition.field,
            operator,
            value: definition.value,
            order: definition.order,
        })
    }
}

impl From<&Rule> for RuleDefinition {
    fn from(rule: &Rule) -> Self {
        Self {
            id: rule.id.0.clone(),
            label: rule.label.clone(),
            field: rule.field.clone(),
            operator: rule.operator.symbol().to_string(),
            value: rule.value.clone(),
            order: rule.order,
        }
    }
}

impl Registry {
    /// Build a registry, failing on the first invalid or duplicate entry.
    pub fn from_definition(definition: RegistryDefinition) -> Result<Self, RegistryError> {
        let mut registry = Registry::new();

        for question in definition.questions {
            registry.add_question(question)?;
        }

        for rule in definition.rules {
            registry.add_rule(Rule::try_from(rule)?)?;
        }

        info!(
            questions = registry.question_count(),
            rules = registry.rule_count(),
            "loaded scoring registry"
        );
        Ok(registry)
    }

    pub fn to_definition(&self) -> RegistryDefinition {
        RegistryDefinition {
            questions: self.list_questions(),
            rules: self.rules().map(RuleDefinition::from).collect(),
        }
    }
}
