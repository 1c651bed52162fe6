use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use validator::{Validate, ValidationError};

use tracing::debug;

use crate::middleware::OnInvalid;
use crate::store::{Reducer, Store, StoreBuilder};

use super::{ConfigError, MiddlewareKind, ReducerRule, RuleReducer};

/// Top-level configuration for a store
///
/// Example:
/// ```json
/// {
///   "initialState": {"GuiData": {"Coins": 0}},
///   "middleware": ["logger", "schema"],
///   "reducers": [
///     {"action": "SetCoins", "set": "GuiData.Coins", "from": "$.Value"}
///   ],
///   "schemas": {
///     "SetCoins": {"type": "object", "required": ["Value"]}
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_schema_middleware"))]
pub struct StoreConfig {
    /// State the store starts with
    #[serde(default = "empty_object")]
    pub initial_state: Value,

    /// Built-in middlewares, outermost first
    #[serde(default)]
    pub middleware: Vec<MiddlewareKind>,

    /// Declarative reducer rules
    #[serde(default)]
    #[validate(nested)]
    pub reducers: Vec<ReducerRule>,

    /// JSON Schemas keyed by action type
    #[serde(default)]
    pub schemas: HashMap<String, Value>,

    /// Policy of the schema middleware for invalid actions
    #[serde(default)]
    pub on_invalid: OnInvalid,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn validate_schema_middleware(config: &StoreConfig) -> Result<(), ValidationError> {
    if config.middleware.contains(&MiddlewareKind::Schema) && config.schemas.is_empty() {
        let mut error = ValidationError::new("missing_schemas");
        error.message = Some("the schema middleware needs at least one entry in 'schemas'".into());
        return Err(error);
    }
    Ok(())
}

impl StoreConfig {
    /// Parse and validate a configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        debug!(path = %path.display(), "loading store configuration");
        Self::from_json(&json)
    }

    /// A builder using the configured rules as reducer and the configured middlewares
    pub fn builder(&self) -> Result<StoreBuilder, ConfigError> {
        let reducer = RuleReducer::new(&self.reducers)?;
        self.builder_with(reducer)
    }

    /// A builder using a custom reducer with the configured middlewares
    pub fn builder_with(&self, reducer: impl Reducer) -> Result<StoreBuilder, ConfigError> {
        let mut builder = Store::builder(reducer, self.initial_state.clone());
        for kind in &self.middleware {
            builder = builder.middleware_boxed(kind.instantiate(self)?);
        }
        Ok(builder)
    }

    /// Build the configured store
    pub fn build_store(&self) -> Result<Store, ConfigError> {
        Ok(self.builder()?.build())
    }
}
