use tokio::runtime::Handle;
use tracing::{debug, error};

use crate::action::Action;
use crate::pipeline::{Dispatch, DispatchError, Middleware, Transformer};
use crate::store::StoreHandle;

/// Runs callable actions on their own tokio task (fire-and-forget)
///
/// A [`Action::Thunk`] goes to the blocking pool, an [`Action::Task`] is
/// spawned as an async task. Dispatch returns as soon as the work is
/// scheduled; there is no join handle, no cancellation and no timeout.
/// Errors raised by the spawned work never reach the dispatch caller: they
/// are reported with `tracing::error!`.
///
/// Records are forwarded unchanged.
#[derive(Debug, Clone, Default)]
pub struct SpawnMiddleware {
    runtime: Option<Handle>,
}

impl SpawnMiddleware {
    /// Spawn on the runtime the dispatch call happens on
    pub fn new() -> Self {
        Self { runtime: None }
    }

    /// Spawn on a specific runtime, so dispatch works from any thread
    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime: Some(runtime),
        }
    }

    fn runtime(&self) -> Result<Handle, DispatchError> {
        match &self.runtime {
            Some(runtime) => Ok(runtime.clone()),
            None => Handle::try_current().map_err(|_| DispatchError::NoRuntime),
        }
    }
}

impl Middleware for SpawnMiddleware {
    fn bind(self: Box<Self>, store: StoreHandle) -> Transformer {
        Box::new(move |next: Dispatch| {
            Dispatch::new(move |action| match action {
                Action::Thunk(thunk) => {
                    let store = store.clone();
                    self.runtime()?.spawn_blocking(move || {
                        if let Err(e) = thunk(store) {
                            error!(error = %e, "spawned thunk failed");
                        }
                    });
                    debug!("thunk spawned");
                    Ok(())
                }
                Action::Task(task) => {
                    let store = store.clone();
                    self.runtime()?.spawn(async move {
                        if let Err(e) = task(store).await {
                            error!(error = %e, "spawned task failed");
                        }
                    });
                    debug!("task spawned");
                    Ok(())
                }
                record => next.call(record),
            })
        })
    }

    fn name(&self) -> &'static str {
        "spawn"
    }
}
