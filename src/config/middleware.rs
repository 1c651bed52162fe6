use serde::{Deserialize, Serialize};
use std::fmt;

use crate::middleware::{
    InspectorMiddleware, LoggerMiddleware, SchemaMiddleware, SpawnMiddleware, ThunkMiddleware,
};
use crate::pipeline::Middleware;

use super::{ConfigError, StoreConfig};

/// A built-in middleware, named in configuration
///
/// Example: `"middleware": ["logger", "schema", "thunk"]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiddlewareKind {
    Logger,
    Inspector,
    Thunk,
    Spawn,
    Schema,
}

impl MiddlewareKind {
    /// Create the middleware, pulling schemas and policies from `config`
    pub fn instantiate(self, config: &StoreConfig) -> Result<Box<dyn Middleware>, ConfigError> {
        Ok(match self {
            Self::Logger => Box::new(LoggerMiddleware::new()),
            Self::Inspector => Box::new(InspectorMiddleware::new()),
            Self::Thunk => Box::new(ThunkMiddleware::new()),
            Self::Spawn => Box::new(SpawnMiddleware::new()),
            Self::Schema => {
                let mut schemas = SchemaMiddleware::new().on_invalid(config.on_invalid);
                for (action, schema) in &config.schemas {
                    schemas = schemas.with_schema(action.clone(), schema)?;
                }
                Box::new(schemas)
            }
        })
    }
}

impl fmt::Display for MiddlewareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Logger => "logger",
            Self::Inspector => "inspector",
            Self::Thunk => "thunk",
            Self::Spawn => "spawn",
            Self::Schema => "schema",
        };
        f.write_str(name)
    }
}
