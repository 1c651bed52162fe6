use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::pipeline::{Dispatch, Middleware, Transformer};
use crate::store::StoreHandle;

/// Receives the type of each dispatched record
pub type TypeSink = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// Records the `Type` of every structured action, then forwards it
///
/// By default each type is emitted as a `tracing` event at INFO level;
/// [`LoggerMiddleware::with_sink`] redirects it elsewhere.
#[derive(Clone, Default)]
pub struct LoggerMiddleware {
    sink: Option<TypeSink>,
}

impl LoggerMiddleware {
    /// Log action types through `tracing`
    pub fn new() -> Self {
        Self { sink: None }
    }

    /// Send action types to a custom sink instead
    pub fn with_sink<F>(sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            sink: Some(Arc::new(sink)),
        }
    }

    fn record(&self, action_type: &str) {
        match &self.sink {
            Some(sink) => sink(action_type),
            None => info!(action = %action_type, "action dispatched"),
        }
    }
}

impl Middleware for LoggerMiddleware {
    fn bind(self: Box<Self>, _store: StoreHandle) -> Transformer {
        Box::new(move |next: Dispatch| {
            Dispatch::new(move |action| {
                match action.action_type() {
                    Some(action_type) => self.record(action_type),
                    None => debug!(kind = action.kind(), "callable dispatched"),
                }
                next.call(action)
            })
        })
    }

    fn name(&self) -> &'static str {
        "logger"
    }
}

impl fmt::Debug for LoggerMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerMiddleware")
            .field("sink", &self.sink.as_ref().map(|_| "<function>"))
            .finish()
    }
}
