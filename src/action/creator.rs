use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::ActionRecord;

/// A named constructor for structured actions
///
/// The payload function builds the non-`Type` fields; the creator stamps its
/// own name as the discriminator, so reducers can match on [`ActionCreator::name`]
/// instead of repeating string literals.
///
/// # Example
/// ```
/// use helium::ActionCreator;
/// use serde_json::{json, Map};
///
/// let awesome = ActionCreator::new("AwesomeAction", |(name, awesome): (&str, bool)| {
///     let mut payload = Map::new();
///     payload.insert("ObjectName".into(), json!(name));
///     payload.insert("IsAwesome".into(), json!(awesome));
///     payload
/// });
///
/// let action = awesome.create(("LPlus", true));
/// assert!(awesome.matches(&action));
/// ```
pub struct ActionCreator<Args> {
    name: String,
    payload: Arc<dyn Fn(Args) -> Map<String, Value> + Send + Sync>,
}

impl<Args> ActionCreator<Args> {
    /// Create an action creator with a payload builder
    pub fn new<F>(name: impl Into<String>, payload: F) -> Self
    where
        F: Fn(Args) -> Map<String, Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            payload: Arc::new(payload),
        }
    }

    /// The action type every created record carries
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build a record from the given arguments
    pub fn create(&self, args: Args) -> ActionRecord {
        let mut record = ActionRecord::new(self.name.clone());
        for (key, value) in (self.payload)(args) {
            record.insert(key, value);
        }
        record
    }

    /// Check whether a record was produced by (or has the same type as) this creator
    pub fn matches(&self, record: &ActionRecord) -> bool {
        record.is(&self.name)
    }
}

impl ActionCreator<()> {
    /// An action creator without payload
    pub fn unit(name: impl Into<String>) -> Self {
        Self::new(name, |()| Map::new())
    }
}

impl<Args> Clone for ActionCreator<Args> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            payload: Arc::clone(&self.payload),
        }
    }
}

impl<Args> fmt::Debug for ActionCreator<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("name", &self.name)
            .field("payload", &"<function>")
            .finish()
    }
}
