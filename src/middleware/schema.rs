use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::action::Action;
use crate::config::ConfigError;
use crate::pipeline::{Dispatch, DispatchError, Middleware, Transformer};
use crate::store::StoreHandle;

/// What to do with an action that fails its schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnInvalid {
    /// Fail the dispatch call with [`DispatchError::ValidationFailed`]
    #[default]
    Reject,
    /// Swallow the action and log a warning
    Drop,
}

/// Validates structured actions against a JSON Schema registered for their type
///
/// Actions whose type has no schema, and callables, are forwarded unchanged.
///
/// # Example
/// ```
/// use helium::middleware::SchemaMiddleware;
/// use serde_json::json;
///
/// let schemas = SchemaMiddleware::new()
///     .with_schema("SetCoins", &json!({
///         "type": "object",
///         "required": ["Value"],
///         "properties": {"Value": {"type": "integer", "minimum": 0}}
///     }))
///     .unwrap();
/// assert_eq!(schemas.len(), 1);
/// ```
#[derive(Default)]
pub struct SchemaMiddleware {
    validators: HashMap<String, Validator>,
    on_invalid: OnInvalid,
}

impl SchemaMiddleware {
    /// A middleware with no schema, rejecting invalid actions
    pub fn new() -> Self {
        Self {
            validators: HashMap::new(),
            on_invalid: OnInvalid::Reject,
        }
    }

    /// Compile and register a schema for an action type
    pub fn with_schema(mut self, action_type: impl Into<String>, schema: &Value) -> Result<Self, ConfigError> {
        let action_type = action_type.into();
        let validator = jsonschema::validator_for(schema).map_err(|e| ConfigError::Schema {
            action: action_type.clone(),
            message: e.to_string(),
        })?;
        self.validators.insert(action_type, validator);
        Ok(self)
    }

    /// Choose between rejecting and dropping invalid actions
    pub fn on_invalid(mut self, on_invalid: OnInvalid) -> Self {
        self.on_invalid = on_invalid;
        self
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Check if no schema is registered
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// All error messages for an action, empty when it is valid or has no schema
    fn check(&self, action_type: &str, action: &Value) -> Vec<String> {
        match self.validators.get(action_type) {
            Some(validator) => validator.iter_errors(action).map(|e| e.to_string()).collect(),
            None => Vec::new(),
        }
    }
}

impl Middleware for SchemaMiddleware {
    fn bind(self: Box<Self>, _store: StoreHandle) -> Transformer {
        Box::new(move |next: Dispatch| {
            Dispatch::new(move |action| {
                if let Action::Structured(record) = &action {
                    let errors = self.check(record.action_type(), &record.to_value());
                    if !errors.is_empty() {
                        match self.on_invalid {
                            OnInvalid::Reject => {
                                return Err(DispatchError::validation_failed(
                                    record.action_type(),
                                    errors,
                                ));
                            }
                            OnInvalid::Drop => {
                                warn!(action = %record.action_type(), errors = ?errors, "dropping invalid action");
                                return Ok(());
                            }
                        }
                    }
                }
                next.call(action)
            })
        })
    }

    fn name(&self) -> &'static str {
        "schema"
    }
}

impl fmt::Debug for SchemaMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.validators.keys().collect();
        types.sort();
        f.debug_struct("SchemaMiddleware")
            .field("schemas", &types)
            .field("on_invalid", &self.on_invalid)
            .finish()
    }
}
