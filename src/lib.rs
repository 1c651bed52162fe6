/// helium - A Redux-style store with a middleware dispatch pipeline
///
/// This library provides a store whose single dispatch entry point is an
/// ordered chain of middlewares composed around the root reducer, plus the
/// built-in middlewares (logger, inspector, thunk, spawn, schema) and a
/// declarative JSON configuration format.

pub mod action;
pub mod config;
pub mod middleware;
pub mod pipeline;
pub mod replay;
pub mod store;

// Re-export commonly used types
pub use action::{Action, ActionCreator, ActionRecord};
pub use config::{ConfigError, StoreConfig};
pub use pipeline::{Dispatch, DispatchError, Middleware, Transformer};
pub use store::{Reducer, State, Store, StoreBuilder, StoreHandle};
