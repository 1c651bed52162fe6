use tracing::debug;

use crate::action::Action;
use crate::pipeline::{Dispatch, Middleware, Transformer};
use crate::store::StoreHandle;

/// Runs thunk actions inline instead of forwarding them
///
/// A [`Action::Thunk`] is called synchronously with the store handle, which
/// gives it both `dispatch` and `get_state`; its result becomes the result of
/// the dispatch call. Records and async tasks are forwarded unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThunkMiddleware;

impl ThunkMiddleware {
    /// Create a new thunk middleware
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for ThunkMiddleware {
    fn bind(self: Box<Self>, store: StoreHandle) -> Transformer {
        Box::new(move |next: Dispatch| {
            Dispatch::new(move |action| match action {
                Action::Thunk(thunk) => {
                    debug!("running thunk");
                    thunk(store.clone())
                }
                other => next.call(other),
            })
        })
    }

    fn name(&self) -> &'static str {
        "thunk"
    }
}
