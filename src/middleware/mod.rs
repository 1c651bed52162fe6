/// Built-in middlewares
///
/// - [`LoggerMiddleware`] records the type of every action
/// - [`InspectorMiddleware`] records every action in full
/// - [`ThunkMiddleware`] runs thunks inline
/// - [`SpawnMiddleware`] runs thunks and tasks on their own tokio task
/// - [`SchemaMiddleware`] validates actions against JSON Schemas

mod inspector;
mod logger;
mod schema;
mod spawn;
mod thunk;

pub use inspector::{InspectorMiddleware, ValueSink};
pub use logger::{LoggerMiddleware, TypeSink};
pub use schema::{OnInvalid, SchemaMiddleware};
pub use spawn::SpawnMiddleware;
pub use thunk::ThunkMiddleware;
