//! Business rule definitions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use core_kernel::expression::to_number;
use core_kernel::{Condition, ConditionOperator, LogicalOperator, RuleId, Severity};

use crate::error::{RuleError, RuleResult};

/// Rule type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    Validation,
    Scoring,
    Flagging,
    Blocking,
}

/// Action executed when a rule triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    SetFlag,
    AddScore,
    BlockClaim,
    RequireVerification,
    CreateCase,
    SendAlert,
}

/// An action with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAction {
    pub action_type: ActionType,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl RuleAction {
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            parameters: Map::new(),
        }
    }

    pub fn add_score(score: f64) -> Self {
        Self::new(ActionType::AddScore).with_parameter("score", Value::from(score))
    }

    pub fn set_flag(flag: impl Into<String>) -> Self {
        Self::new(ActionType::SetFlag).with_parameter("flag", Value::String(flag.into()))
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// `parameters.score` as a number, 0 when absent or non-numeric
    pub fn score(&self) -> f64 {
        self.parameters.get("score").and_then(to_number).unwrap_or(0.0)
    }

    /// A string parameter
    pub fn text(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(Value::as_str)
    }
}

/// A configurable business rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRule {
    pub id: RuleId,
    pub name: String,
    pub description: String,
    pub rule_type: RuleType,
    pub category: String,
    pub conditions: Vec<Condition>,
    pub actions: Vec<RuleAction>,
    pub severity: Severity,
    pub is_active: bool,
    pub effective_date: NaiveDate,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

impl BusinessRule {
    /// Creates an active rule with no conditions or actions
    pub fn new(
        id: impl Into<RuleId>,
        name: impl Into<String>,
        rule_type: RuleType,
        category: impl Into<String>,
        severity: Severity,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            rule_type,
            category: category.into(),
            conditions: Vec::new(),
            actions: Vec::new(),
            severity,
            is_active: true,
            effective_date: now.date_naive(),
            created_date: now,
            modified_date: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn effective_from(mut self, date: NaiveDate) -> Self {
        self.effective_date = date;
        self
    }

    /// Active and already effective on the given date
    pub fn is_in_effect(&self, on: NaiveDate) -> bool {
        self.is_active && self.effective_date <= on
    }

    pub fn when(mut self, field: &str, operator: ConditionOperator, value: Value) -> Self {
        self.conditions.push(Condition::new(field, operator, value));
        self
    }

    pub fn then(mut self, action: RuleAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Sum of all `ADD_SCORE` amounts
    pub fn score_contribution(&self) -> f64 {
        self.actions
            .iter()
            .filter(|a| a.action_type == ActionType::AddScore)
            .map(RuleAction::score)
            .sum()
    }

    /// True if any condition carries an OR annotation
    pub fn uses_or(&self) -> bool {
        self.conditions
            .iter()
            .any(|c| c.logical_operator == Some(LogicalOperator::Or))
    }

    /// Rejects definitions that could never evaluate as written
    pub fn validate(&self) -> RuleResult<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(RuleError::InvalidDefinition("rule id must not be empty".into()));
        }
        for condition in &self.conditions {
            if condition.operator != ConditionOperator::Regex {
                continue;
            }
            let pattern = condition.value.as_str().ok_or_else(|| RuleError::InvalidPattern {
                rule_id: self.id.clone(),
                field: condition.field.clone(),
                message: "regex operand must be a string".into(),
            })?;
            regex::Regex::new(pattern).map_err(|e| RuleError::InvalidPattern {
                rule_id: self.id.clone(),
                field: condition.field.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Partial update of a rule; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub conditions: Option<Vec<Condition>>,
    pub actions: Option<Vec<RuleAction>>,
    pub severity: Option<Severity>,
    pub is_active: Option<bool>,
    pub effective_date: Option<NaiveDate>,
}

impl RuleUpdate {
    /// Applies the update and stamps the modification time
    pub(crate) fn apply_to(self, rule: &mut BusinessRule) {
        if let Some(name) = self.name {
            rule.name = name;
        }
        if let Some(description) = self.description {
            rule.description = description;
        }
        if let Some(category) = self.category {
            rule.category = category;
        }
        if let Some(conditions) = self.conditions {
            rule.conditions = conditions;
        }
        if let Some(actions) = self.actions {
            rule.actions = actions;
        }
        if let Some(severity) = self.severity {
            rule.severity = severity;
        }
        if let Some(is_active) = self.is_active {
            rule.is_active = is_active;
        }
        if let Some(effective_date) = self.effective_date {
            rule.effective_date = effective_date;
        }
        rule.modified_date = Utc::now();
    }
}
