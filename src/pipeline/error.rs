use thiserror::Error;

/// Errors that can surface from a dispatch call
///
/// The pipeline itself never produces an error for a swallowed action:
/// a middleware that does not call `next` simply ends propagation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// A value could not be turned into an action record
    #[error("Invalid action: {message}")]
    InvalidAction { message: String },

    /// A thunk or task reached the root reducer without being intercepted
    #[error("Unhandled callable action: no middleware intercepted a {kind}")]
    UnhandledCallable { kind: &'static str },

    /// The reducer rejected an action
    #[error("Reducer failed on '{action}': {message}")]
    Reducer { action: String, message: String },

    /// The action did not match the schema registered for its type
    #[error("Validation failed for '{action}': {}", errors.join("; "))]
    ValidationFailed { action: String, errors: Vec<String> },

    /// A state path could not be read or written
    #[error("State path '{path}': {message}")]
    StatePath { path: String, message: String },

    /// A JSONPath query against the state failed
    #[error("Query '{query}' failed: {message}")]
    Query { query: String, message: String },

    /// A spawning middleware was used outside of a tokio runtime
    #[error("No tokio runtime available to spawn action")]
    NoRuntime,

    /// Dispatch was attempted while middlewares were still being bound
    #[error("Store is not ready: middlewares are still being applied")]
    NotReady,

    /// The store behind a handle has been dropped
    #[error("Store has been dropped")]
    StoreDropped,

    /// Generic error for custom middleware and reducer failures
    #[error("{message}")]
    Custom { message: String },
}

impl DispatchError {
    /// Create an InvalidAction error
    pub fn invalid_action(message: impl Into<String>) -> Self {
        Self::InvalidAction {
            message: message.into(),
        }
    }

    /// Create a Reducer error for the given action type
    pub fn reducer(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Reducer {
            action: action.into(),
            message: message.into(),
        }
    }

    /// Create a ValidationFailed error
    pub fn validation_failed(action: impl Into<String>, errors: Vec<String>) -> Self {
        Self::ValidationFailed {
            action: action.into(),
            errors,
        }
    }

    /// Create a StatePath error
    pub fn state_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StatePath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a Custom error
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}
