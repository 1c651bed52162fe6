use serde_json::{Map, Value};

use crate::action::type_name;
use crate::pipeline::DispatchError;

/// The store's state tree
///
/// State is a JSON value (an object unless replaced wholesale). Reads and
/// writes address it by key path: object keys, or array indices given as
/// decimal strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    root: Value,
}

impl State {
    /// Create an empty object state
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    /// Create a state from an initial value
    ///
    /// # Example
    /// ```
    /// use helium::State;
    /// use serde_json::json;
    ///
    /// let state = State::from_value(json!({"GuiData": {"Coins": 0}}));
    /// assert_eq!(state.get(&["GuiData", "Coins"]), Some(&json!(0)));
    /// ```
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// The whole tree
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Consume the state, returning the tree
    pub fn into_value(self) -> Value {
        self.root
    }

    /// Get a value by key path. The empty path is the root.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let mut current = &self.root;

        for part in path {
            current = match current {
                Value::Object(map) => map.get(part.as_ref())?,
                Value::Array(arr) => {
                    // Try to parse as array index
                    let index: usize = part.as_ref().parse().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }

        Some(current)
    }

    /// Get a value using a dotted path (e.g., "GuiData.Coins" or "items.0")
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        self.get(&split_path(path))
    }

    /// Check if a key path exists
    pub fn has<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.get(path).is_some()
    }

    /// Set a value by key path, returning the previous value
    ///
    /// Missing (or null) intermediate keys are created as objects. Writing
    /// through a scalar, or to an array index out of bounds, is an error.
    /// The empty path replaces the root.
    pub fn set<S: AsRef<str>>(
        &mut self,
        path: &[S],
        value: Value,
    ) -> Result<Option<Value>, DispatchError> {
        let Some((last, parents)) = path.split_last() else {
            return Ok(Some(std::mem::replace(&mut self.root, value)));
        };

        let mut current = &mut self.root;
        for (depth, part) in parents.iter().enumerate() {
            let part = part.as_ref();
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            current = match current {
                Value::Object(map) => map
                    .entry(part.to_string())
                    .or_insert_with(|| Value::Object(Map::new())),
                Value::Array(arr) => {
                    let index = parse_index(path, depth, part, arr.len())?;
                    &mut arr[index]
                }
                other => {
                    return Err(DispatchError::state_path(
                        join_path(&path[..=depth]),
                        format!("cannot descend into {}", type_name(other)),
                    ));
                }
            };
        }

        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        let last = last.as_ref();
        match current {
            Value::Object(map) => Ok(map.insert(last.to_string(), value)),
            Value::Array(arr) => {
                let index = parse_index(path, parents.len(), last, arr.len())?;
                Ok(Some(std::mem::replace(&mut arr[index], value)))
            }
            other => Err(DispatchError::state_path(
                join_path(path),
                format!("cannot set a field on {}", type_name(other)),
            )),
        }
    }

    /// Set a value using a dotted path
    pub fn set_path(&mut self, path: &str, value: Value) -> Result<Option<Value>, DispatchError> {
        self.set(&split_path(path), value)
    }

    /// Query the state with a JSONPath expression (e.g., "$.players[*].name")
    pub fn query(&self, query: &str) -> Result<Vec<Value>, DispatchError> {
        use jsonpath_rust::JsonPath;

        let results = self.root.query(query).map_err(|e| DispatchError::Query {
            query: query.to_string(),
            message: e.to_string(),
        })?;

        Ok(results.into_iter().cloned().collect())
    }
}

/// Split a dotted path into segments. The empty string is the root.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    }
}

fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(".")
}

fn parse_index<S: AsRef<str>>(
    path: &[S],
    depth: usize,
    part: &str,
    length: usize,
) -> Result<usize, DispatchError> {
    let index: usize = part.parse().map_err(|_| {
        DispatchError::state_path(join_path(&path[..=depth]), "array index must be a number")
    })?;
    if index >= length {
        return Err(DispatchError::state_path(
            join_path(&path[..=depth]),
            format!("index {} out of bounds (length: {})", index, length),
        ));
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coins_state() -> State {
        State::from_value(json!({
            "GuiData": {"Coins": 0},
            "LPlus": false,
            "items": [{"name": "Sword"}, {"name": "Shield"}]
        }))
    }

    #[test]
    fn test_new_state_is_empty_object() {
        assert_eq!(State::new().root(), &json!({}));
    }

    #[test]
    fn test_get_nested() {
        let state = coins_state();
        assert_eq!(state.get(&["GuiData", "Coins"]), Some(&json!(0)));
        assert_eq!(state.get(&["LPlus"]), Some(&json!(false)));
        assert_eq!(state.get(&["GuiData", "Missing"]), None);
        assert_eq!(state.get::<&str>(&[]), Some(&coins_state().into_value()));
    }

    #[test]
    fn test_has() {
        let state = coins_state();
        assert!(state.has(&["GuiData", "Coins"]));
        assert!(state.has(&["items", "0", "name"]));
        assert!(!state.has(&["GuiData", "Gems"]));
        assert!(!state.has(&["LPlus", "nothing"]));
    }

    #[test]
    fn test_get_path_array_index() {
        let state = coins_state();
        assert_eq!(state.get_path("items.1.name"), Some(&json!("Shield")));
        assert_eq!(state.get_path("items.9"), None);
        assert_eq!(state.get_path("LPlus.nothing"), None);
    }

    #[test]
    fn test_set_existing_returns_previous() {
        let mut state = coins_state();
        let previous = state.set(&["GuiData", "Coins"], json!(5)).unwrap();
        assert_eq!(previous, Some(json!(0)));
        assert_eq!(state.get_path("GuiData.Coins"), Some(&json!(5)));
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut state = State::new();
        assert_eq!(state.set_path("a.b.c", json!(1)).unwrap(), None);
        assert_eq!(state.root(), &json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_set_array_element() {
        let mut state = coins_state();
        state.set_path("items.0.name", json!("Axe")).unwrap();
        assert_eq!(state.get_path("items.0.name"), Some(&json!("Axe")));

        let err = state.set_path("items.5.name", json!("Bow")).unwrap_err();
        assert_eq!(
            err,
            DispatchError::state_path("items.5", "index 5 out of bounds (length: 2)")
        );
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut state = coins_state();
        let err = state.set_path("LPlus.inner", json!(1)).unwrap_err();
        assert_eq!(
            err,
            DispatchError::state_path("LPlus.inner", "cannot set a field on boolean")
        );
        let err = state.set_path("GuiData.Coins.a.b", json!(1)).unwrap_err();
        assert_eq!(
            err,
            DispatchError::state_path("GuiData.Coins.a", "cannot descend into number")
        );
    }

    #[test]
    fn test_set_empty_path_replaces_root() {
        let mut state = coins_state();
        state.set_path("", json!({"fresh": true})).unwrap();
        assert_eq!(state.root(), &json!({"fresh": true}));
    }

    #[test]
    fn test_query() {
        let state = coins_state();
        assert_eq!(
            state.query("$.items[*].name").unwrap(),
            vec![json!("Sword"), json!("Shield")]
        );
        assert!(state.query("$.missing").unwrap().is_empty());
        assert!(matches!(
            state.query("not a path ["),
            Err(DispatchError::Query { .. })
        ));
    }
}
