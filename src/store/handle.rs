use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::action::Action;
use crate::pipeline::DispatchError;

use super::{Listener, Shared, State, SubscriptionId};

/// A weak, clonable capability on a store
///
/// Middlewares receive one when they are bound, and thunks receive one when
/// they are invoked. It exposes the store's dispatch, state reads and writes,
/// without keeping the store alive: once the [`Store`](super::Store) is
/// dropped every call returns [`DispatchError::StoreDropped`].
#[derive(Clone)]
pub struct StoreHandle {
    pub(super) shared: Weak<Shared>,
}

impl StoreHandle {
    fn upgrade(&self) -> Result<Arc<Shared>, DispatchError> {
        self.shared.upgrade().ok_or(DispatchError::StoreDropped)
    }

    /// Dispatch through the full pipeline, starting at the outermost middleware
    pub fn dispatch(&self, action: impl Into<Action>) -> Result<(), DispatchError> {
        // Release the strong reference before entering the pipeline.
        let dispatch = self.upgrade()?.entry()?;
        dispatch.call(action)
    }

    /// Get a copy of the value at a key path
    pub fn get_state<S: AsRef<str>>(&self, path: &[S]) -> Result<Option<Value>, DispatchError> {
        Ok(self.upgrade()?.read(|state| state.get(path).cloned()))
    }

    /// Get a copy of the value at a dotted path
    pub fn get_path(&self, path: &str) -> Result<Option<Value>, DispatchError> {
        Ok(self.upgrade()?.read(|state| state.get_path(path).cloned()))
    }

    /// Query the state with a JSONPath expression
    pub fn query(&self, query: &str) -> Result<Vec<Value>, DispatchError> {
        self.upgrade()?.read(|state| state.query(query))
    }

    /// A copy of the whole state
    pub fn snapshot(&self) -> Result<State, DispatchError> {
        Ok(self.upgrade()?.read(State::clone))
    }

    /// Write a value at a key path, bypassing the reducer
    pub fn set_state<S: AsRef<str>>(
        &self,
        path: &[S],
        value: Value,
    ) -> Result<Option<Value>, DispatchError> {
        self.upgrade()?.write(path, value)
    }

    /// Register a change listener
    pub fn subscribe<F>(&self, listener: F) -> Result<SubscriptionId, DispatchError>
    where
        F: Fn(Option<&str>, &State) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        Ok(self.upgrade()?.subscribe(listener))
    }

    /// Check whether the store is still alive
    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
