use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use validator::{Validate, ValidationError};

use crate::action::ActionRecord;
use crate::pipeline::DispatchError;
use crate::store::{Reducer, State, split_path};

use super::ConfigError;

/// A declarative reducer rule
///
/// When an action of type `action` is reduced, the state at `set` receives
/// either the first match of the JSONPath `from` evaluated on the action, or
/// the literal `value`.
///
/// Example:
/// ```json
/// {"action": "SetCoins", "set": "GuiData.Coins", "from": "$.Value"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_source"))]
pub struct ReducerRule {
    /// Action type this rule applies to
    #[validate(length(min = 1, message = "action type must not be empty"))]
    pub action: String,

    /// Dotted state path to write
    #[validate(length(min = 1, message = "state path must not be empty"))]
    pub set: String,

    /// JSONPath selecting the value from the action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Literal value to write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

fn validate_source(rule: &ReducerRule) -> Result<(), ValidationError> {
    if rule.from.is_some() && rule.value.is_some() {
        let mut error = ValidationError::new("exclusive_source");
        error.message = Some(format!("rule for '{}' sets both 'from' and 'value'", rule.action).into());
        return Err(error);
    }
    Ok(())
}

impl ReducerRule {
    /// The value this rule writes for a given action
    fn resolve(&self, action: &ActionRecord) -> Result<Value, DispatchError> {
        use jsonpath_rust::JsonPath;

        match (&self.from, &self.value) {
            (Some(path), _) => {
                let source = action.to_value();
                let matches = source.query(path).map_err(|e| DispatchError::Query {
                    query: path.clone(),
                    message: e.to_string(),
                })?;
                Ok(matches.first().map(|v| (*v).clone()).unwrap_or(Value::Null))
            }
            (None, Some(value)) => Ok(value.clone()),
            (None, None) => Ok(Value::Null),
        }
    }
}

/// A reducer built from [`ReducerRule`]s
///
/// Rules are grouped by action type and applied in declaration order;
/// actions without rules leave the state untouched.
#[derive(Debug, Clone, Default)]
pub struct RuleReducer {
    rules: HashMap<String, Vec<ReducerRule>>,
}

impl RuleReducer {
    /// Group rules by action type, checking every JSONPath parses
    pub fn new(rules: &[ReducerRule]) -> Result<Self, ConfigError> {
        use jsonpath_rust::JsonPath;

        let mut grouped: HashMap<String, Vec<ReducerRule>> = HashMap::new();
        for rule in rules {
            if let Some(path) = &rule.from {
                Value::Null.query(path).map_err(|e| ConfigError::Path {
                    action: rule.action.clone(),
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            }
            grouped.entry(rule.action.clone()).or_default().push(rule.clone());
        }

        Ok(Self { rules: grouped })
    }

    /// Number of action types with at least one rule
    pub fn action_count(&self) -> usize {
        self.rules.len()
    }
}

impl Reducer for RuleReducer {
    fn reduce(&self, action: &ActionRecord, state: &mut State) -> Result<(), DispatchError> {
        let Some(rules) = self.rules.get(action.action_type()) else {
            return Ok(());
        };

        for rule in rules {
            let value = rule.resolve(action)?;
            state.set(&split_path(&rule.set), value)?;
        }
        Ok(())
    }
}
