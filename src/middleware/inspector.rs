use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::pipeline::{Dispatch, Middleware, Transformer};
use crate::store::StoreHandle;

/// Receives every dispatched record as a JSON value
pub type ValueSink = Arc<dyn Fn(&Value) + Send + Sync + 'static>;

/// Records the whole structured action, then forwards it unchanged
#[derive(Clone, Default)]
pub struct InspectorMiddleware {
    sink: Option<ValueSink>,
}

impl InspectorMiddleware {
    /// Print actions as pretty JSON through `tracing`
    pub fn new() -> Self {
        Self { sink: None }
    }

    /// Send actions to a custom sink instead
    pub fn with_sink<F>(sink: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        Self {
            sink: Some(Arc::new(sink)),
        }
    }

    fn record(&self, action: &Value) {
        match &self.sink {
            Some(sink) => sink(action),
            None => {
                let pretty = serde_json::to_string_pretty(action).unwrap_or_else(|_| action.to_string());
                info!("action dispatched:\n{}", pretty);
            }
        }
    }
}

impl Middleware for InspectorMiddleware {
    fn bind(self: Box<Self>, _store: StoreHandle) -> Transformer {
        Box::new(move |next: Dispatch| {
            Dispatch::new(move |action| {
                match action.as_record() {
                    Some(record) => self.record(&record.to_value()),
                    None => debug!(kind = action.kind(), "callable dispatched"),
                }
                next.call(action)
            })
        })
    }

    fn name(&self) -> &'static str {
        "inspector"
    }
}

impl fmt::Debug for InspectorMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectorMiddleware")
            .field("sink", &self.sink.as_ref().map(|_| "<function>"))
            .finish()
    }
}
