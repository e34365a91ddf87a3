use std::cmp::Ordering;

use super::super::domain::{ApplicationRecord, FieldValue, Rule, RuleOperator};
use super::super::registry::Registry;

/// First rule, in registry order, whose comparison holds for the record.
pub(crate) fn first_disqualifier<'r>(
    record: &ApplicationRecord,
    registry: &'r Registry,
) -> Option<&'r Rule> {
    registry.rules().find(|rule| rule_matches(record, rule))
}

pub(crate) fn rule_matches(record: &ApplicationRecord, rule: &Rule) -> bool {
    match record.resolve_field(&rule.field) {
        Some(value) => compare(value, rule.operator, &rule.value),
        None => false,
    }
}

/// Mixed types, boolean ordering, and NaN never match.
pub(crate) fn compare(left: &FieldValue, operator: RuleOperator, right: &FieldValue) -> bool {
    let ordering = match (left, right) {
        (FieldValue::Number(left), FieldValue::Number(right)) => left.partial_cmp(right),
        (FieldValue::Text(left), FieldValue::Text(right)) => Some(left.as_str().cmp(right)),
        (FieldValue::Boolean(left), FieldValue::Boolean(right)) if operator.is_equality() => {
            Some(if left == right {
                Ordering::Equal
            } else {
                Ordering::Less
            })
        }
        _ => None,
    };

    ordering.is_some_and(|ordering| operator.accepts(ordering))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: f64) -> FieldValue {
        FieldValue::Number(value)
    }

    #[test]
    fn numeric_comparisons_follow_operator() {
        assert!(compare(&num(45.0), RuleOperator::GreaterThan, &num(30.0)));
        assert!(!compare(&num(30.0), RuleOperator::GreaterThan, &num(30.0)));
        assert!(compare(&num(30.0), RuleOperator::GreaterOrEqual, &num(30.0)));
        assert!(compare(&num(12.0), RuleOperator::LessThan, &num(30.0)));
        assert!(compare(&num(30.0), RuleOperator::LessOrEqual, &num(30.0)));
        assert!(compare(&num(30.0), RuleOperator::Equal, &num(30.0)));
        assert!(compare(&num(31.0), RuleOperator::NotEqual, &num(30.0)));
    }

    #[test]
    fn text_uses_lexical_order_and_equality() {
        let condo = FieldValue::text("condo");
        let duplex = FieldValue::text("duplex");
        assert!(compare(&condo, RuleOperator::Equal, &FieldValue::text("condo")));
        assert!(compare(&condo, RuleOperator::NotEqual, &duplex));
        assert!(compare(&condo, RuleOperator::LessThan, &duplex));
        assert!(!compare(&condo, RuleOperator::Equal, &FieldValue::text("Condo")));
    }

    #[test]
    fn booleans_only_support_equality() {
        let yes = FieldValue::Boolean(true);
        let no = FieldValue::Boolean(false);
        assert!(compare(&no, RuleOperator::Equal, &no));
        assert!(compare(&yes, RuleOperator::NotEqual, &no));
        assert!(!compare(&yes, RuleOperator::GreaterThan, &no));
        assert!(!compare(&yes, RuleOperator::LessOrEqual, &yes));
    }

    #[test]
    fn mixed_types_and_nan_never_match() {
        for operator in RuleOperator::ordered() {
            assert!(!compare(&FieldValue::text("45"), operator, &num(30.0)));
            assert!(!compare(&FieldValue::Boolean(true), operator, &num(1.0)));
            assert!(!compare(&num(f64::NAN), operator, &num(30.0)));
        }
    }
}
