use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pipeline::DispatchError;

/// Key of the discriminator field every structured action carries
pub const ACTION_TYPE_KEY: &str = "Type";

/// A structured action: a JSON object with a string `Type` discriminator
///
/// The pipeline never inspects anything but `Type`; all other fields are
/// payload interpreted by reducers and middlewares.
///
/// # Example
/// ```
/// use helium::ActionRecord;
/// use serde_json::json;
///
/// let action = ActionRecord::new("AwesomeAction")
///     .with("ObjectName", json!("LPlus"))
///     .with("IsAwesome", json!(true));
///
/// assert_eq!(action.action_type(), "AwesomeAction");
/// assert_eq!(action.get("ObjectName"), Some(&json!("LPlus")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ActionRecord {
    /// All fields, `Type` included
    fields: Map<String, Value>,
}

impl ActionRecord {
    /// Create a record with only the `Type` field set
    pub fn new(action_type: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(ACTION_TYPE_KEY.to_string(), Value::String(action_type.into()));
        Self { fields }
    }

    /// Build a record from a JSON value, which must be an object with a string `Type`
    pub fn from_value(value: Value) -> Result<Self, DispatchError> {
        match value {
            Value::Object(fields) => Self::try_from(fields),
            other => Err(DispatchError::invalid_action(format!(
                "expected an object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Add a payload field (builder style). Setting `Type` is ignored.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a payload field. Returns false if the key was `Type`, which is left untouched.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if key == ACTION_TYPE_KEY {
            return false;
        }
        self.fields.insert(key, value);
        true
    }

    /// The discriminator of this action
    pub fn action_type(&self) -> &str {
        self.fields
            .get(ACTION_TYPE_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Check the discriminator
    pub fn is(&self, action_type: &str) -> bool {
        self.action_type() == action_type
    }

    /// Get a field by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields, `Type` included
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The record as a JSON object value
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl TryFrom<Map<String, Value>> for ActionRecord {
    type Error = DispatchError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        match fields.get(ACTION_TYPE_KEY) {
            Some(Value::String(_)) => Ok(Self { fields }),
            Some(other) => Err(DispatchError::invalid_action(format!(
                "'{}' must be a string, got {}",
                ACTION_TYPE_KEY,
                type_name(other)
            ))),
            None => Err(DispatchError::invalid_action(format!(
                "missing '{}' field",
                ACTION_TYPE_KEY
            ))),
        }
    }
}

impl From<ActionRecord> for Map<String, Value> {
    fn from(record: ActionRecord) -> Self {
        record.fields
    }
}

impl From<ActionRecord> for Value {
    fn from(record: ActionRecord) -> Self {
        Value::Object(record.fields)
    }
}

/// Get the type name of a value for error messages
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
