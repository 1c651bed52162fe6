/// Middleware pipeline
///
/// This module contains the dispatch function type, the middleware
/// factory trait and the right-to-left composition that turns an ordered
/// list of middlewares into a single dispatch entry point.

mod dispatch;
mod error;

pub use dispatch::{Dispatch, Middleware, Pipeline, Transformer, compose};
pub use error::DispatchError;
