use thiserror::Error;

/// Errors raised while loading or applying a store configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file could not be read
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The JSON did not match the configuration format
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Field-level validation failed
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    /// A JSON Schema did not compile
    #[error("Invalid schema for '{action}': {message}")]
    Schema { action: String, message: String },

    /// A reducer rule carries a JSONPath that does not parse
    #[error("Invalid JSONPath '{path}' in reducer for '{action}': {message}")]
    Path {
        action: String,
        path: String,
        message: String,
    },

    /// An actions file line or element is not a valid action
    #[error("Invalid action at index {index}: {message}")]
    Action { index: usize, message: String },
}

impl ConfigError {
    /// Create an Io error for a path
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
