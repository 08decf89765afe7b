//! Condition expression language
//!
//! A condition is a `(field, operator, value)` triple evaluated against a flat
//! map of facts. Rule catalogs and scorer pattern tables are both expressed as
//! lists of conditions, so they can be serialized and edited without embedding
//! code.
//!
//! Evaluation never fails. A condition whose operator cannot be applied to the
//! fact (a non-numeric value under `GREATER_THAN`, an invalid regex, a
//! non-list operand under `IN_LIST`) simply evaluates to `false`.
//!
//! # Example
//!
//! ```rust
//! use core_kernel::expression::{Condition, ConditionOperator, FactMap, evaluate_all};
//! use serde_json::json;
//!
//! let mut facts = FactMap::new();
//! facts.insert("ssn_usage_count".to_string(), json!(2));
//!
//! let conditions = vec![Condition::new("ssn_usage_count", ConditionOperator::GreaterThan, json!(1))];
//! assert!(evaluate_all(&conditions, &facts));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Facts a condition is evaluated against, keyed by field name
pub type FactMap = BTreeMap<String, Value>;

/// Comparison operator of a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    /// Substring match on the string form of both sides
    Contains,
    Regex,
    InList,
    NotInList,
}

/// How a condition combines with the one before it
///
/// Carried as catalog metadata only. Conditions are always combined as a
/// conjunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalOperator {
    And,
    Or,
}

/// A single `(field, operator, value)` test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Fact name, dot notation reaches into nested objects
    pub field: String,
    pub operator: ConditionOperator,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_operator: Option<LogicalOperator>,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: ConditionOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            logical_operator: None,
        }
    }

    /// Attaches a logical operator annotation
    pub fn with_logical_operator(mut self, op: LogicalOperator) -> Self {
        self.logical_operator = Some(op);
        self
    }

    /// Evaluates this condition against the facts
    pub fn evaluate(&self, facts: &FactMap) -> bool {
        let actual = lookup(&self.field, facts).unwrap_or(&Value::Null);
        apply(self.operator, actual, &self.value)
    }
}

/// True when every condition holds; an empty list always holds
pub fn evaluate_all(conditions: &[Condition], facts: &FactMap) -> bool {
    conditions.iter().all(|c| c.evaluate(facts))
}

/// Resolves a field using dot notation
fn lookup<'a>(field: &str, facts: &'a FactMap) -> Option<&'a Value> {
    if let Some(v) = facts.get(field) {
        return Some(v);
    }

    let mut parts = field.split('.');
    let mut current = facts.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

fn apply(operator: ConditionOperator, actual: &Value, expected: &Value) -> bool {
    match operator {
        ConditionOperator::Equals => loose_eq(actual, expected),
        ConditionOperator::NotEquals => !loose_eq(actual, expected),
        ConditionOperator::GreaterThan => compare(actual, expected, |a, b| a > b),
        ConditionOperator::GreaterThanOrEqual => compare(actual, expected, |a, b| a >= b),
        ConditionOperator::LessThan => compare(actual, expected, |a, b| a < b),
        ConditionOperator::LessThanOrEqual => compare(actual, expected, |a, b| a <= b),
        ConditionOperator::Contains => contains(actual, expected),
        ConditionOperator::Regex => matches_regex(actual, expected),
        ConditionOperator::InList => in_list(actual, expected),
        ConditionOperator::NotInList => match expected.as_array() {
            Some(_) => !in_list(actual, expected),
            None => false,
        },
    }
}

/// Numeric comparison; a side that is not a number fails the comparison
fn compare(actual: &Value, expected: &Value, op: impl Fn(f64, f64) -> bool) -> bool {
    match (to_number(actual), to_number(expected)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

/// Coerces a fact to a number, `None` when it has no numeric reading
pub fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Renders a fact as a string for substring and regex tests
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

fn loose_eq(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match (actual, expected) {
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            match (to_number(actual), to_number(expected)) {
                (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
                _ => false,
            }
        }
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
            _ => false,
        },
        (Value::Bool(b), Value::String(s)) | (Value::String(s), Value::Bool(b)) => {
            s.eq_ignore_ascii_case(&b.to_string())
        }
        _ => false,
    }
}

fn contains(actual: &Value, expected: &Value) -> bool {
    if let Value::Array(items) = actual {
        if items.iter().any(|item| loose_eq(item, expected)) {
            return true;
        }
    }
    let needle = to_text(expected);
    !needle.is_empty() && to_text(actual).contains(&needle)
}

fn matches_regex(actual: &Value, expected: &Value) -> bool {
    let Some(pattern) = expected.as_str() else {
        return false;
    };
    match Regex::new(pattern) {
        Ok(re) => re.is_match(&to_text(actual)),
        Err(_) => false,
    }
}

fn in_list(actual: &Value, expected: &Value) -> bool {
    match expected.as_array() {
        Some(list) => list.iter().any(|candidate| loose_eq(actual, candidate)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn facts(pairs: &[(&str, Value)]) -> FactMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_numeric_comparisons() {
        let f = facts(&[("wage_ratio", json!(4.17))]);
        assert!(Condition::new("wage_ratio", ConditionOperator::GreaterThan, json!(3)).evaluate(&f));
        assert!(!Condition::new("wage_ratio", ConditionOperator::LessThan, json!(3)).evaluate(&f));
        assert!(Condition::new("wage_ratio", ConditionOperator::GreaterThan, json!("3.5")).evaluate(&f));
    }

    #[test]
    fn test_non_numeric_fails_comparison() {
        let f = facts(&[("employer_risk_level", json!("HIGH"))]);
        let gt = Condition::new("employer_risk_level", ConditionOperator::GreaterThan, json!(1));
        let lt = Condition::new("employer_risk_level", ConditionOperator::LessThan, json!(1));
        assert!(!gt.evaluate(&f));
        assert!(!lt.evaluate(&f));
    }

    #[test]
    fn test_missing_field() {
        let f = FactMap::new();
        assert!(!Condition::new("absent", ConditionOperator::Equals, json!(1)).evaluate(&f));
        assert!(Condition::new("absent", ConditionOperator::NotEquals, json!(1)).evaluate(&f));
        assert!(!Condition::new("absent", ConditionOperator::GreaterThan, json!(0)).evaluate(&f));
    }

    #[test]
    fn test_contains_is_string_coerced() {
        let f = facts(&[("email", json!("someone@tempmail.org")), ("zip", json!(90210))]);
        assert!(Condition::new("email", ConditionOperator::Contains, json!("tempmail")).evaluate(&f));
        assert!(Condition::new("zip", ConditionOperator::Contains, json!("902")).evaluate(&f));
    }

    #[test]
    fn test_contains_on_flag_list() {
        let f = facts(&[("risk_flags", json!(["DECEASED_MATCH", "ADDRESS_CHANGE"]))]);
        assert!(Condition::new("risk_flags", ConditionOperator::Contains, json!("ADDRESS_CHANGE")).evaluate(&f));
    }

    #[test]
    fn test_regex_and_invalid_regex() {
        let f = facts(&[("phone", json!("555-0100"))]);
        assert!(Condition::new("phone", ConditionOperator::Regex, json!(r"^555-\d{4}$")).evaluate(&f));
        assert!(!Condition::new("phone", ConditionOperator::Regex, json!("([")).evaluate(&f));
    }

    #[test]
    fn test_in_list() {
        let f = facts(&[("status", json!("DENIED"))]);
        let list = json!(["DENIED", "EXHAUSTED"]);
        assert!(Condition::new("status", ConditionOperator::InList, list.clone()).evaluate(&f));
        assert!(!Condition::new("status", ConditionOperator::NotInList, list).evaluate(&f));
        assert!(!Condition::new("status", ConditionOperator::InList, json!("DENIED")).evaluate(&f));
    }

    #[test]
    fn test_dot_notation() {
        let f = facts(&[("employer", json!({"risk_level": "HIGH"}))]);
        assert!(Condition::new("employer.risk_level", ConditionOperator::Equals, json!("HIGH")).evaluate(&f));
    }

    #[test]
    fn test_empty_conditions_hold() {
        assert!(evaluate_all(&[], &FactMap::new()));
    }

    #[test]
    fn test_condition_serde_shape() {
        let c = Condition::new("ssn_usage_count", ConditionOperator::GreaterThan, json!(1))
            .with_logical_operator(LogicalOperator::And);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["operator"], "GREATER_THAN");
        assert_eq!(json["logical_operator"], "AND");
    }
}
