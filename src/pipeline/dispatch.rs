use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::action::Action;
use crate::pipeline::DispatchError;
use crate::store::StoreHandle;

/// A shareable dispatch function: delivers one action to the next stage
///
/// Cloning is one `Arc` increment; the same function may be called from
/// several threads and re-entered from inside itself.
#[derive(Clone)]
pub struct Dispatch(Arc<dyn Fn(Action) -> Result<(), DispatchError> + Send + Sync + 'static>);

impl Dispatch {
    /// Wrap a function as a dispatch stage
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Action) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Deliver an action to this stage
    pub fn call(&self, action: impl Into<Action>) -> Result<(), DispatchError> {
        (self.0)(action.into())
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatch(<function>)")
    }
}

/// Second level of a middleware: wraps the next stage into a new stage
pub type Transformer = Box<dyn FnOnce(Dispatch) -> Dispatch + Send + 'static>;

/// A pipeline stage factory
///
/// `bind` is called exactly once, when the pipeline is built, with a handle
/// to the owning store. The returned [`Transformer`] receives the next stage
/// and returns the function that decides what to do with each action.
///
/// Any `FnOnce(StoreHandle) -> impl FnOnce(Dispatch) -> Dispatch` closure is a
/// middleware:
///
/// ```
/// use helium::{Dispatch, StoreHandle};
///
/// let redundant = |_store: StoreHandle| {
///     |next: Dispatch| Dispatch::new(move |action| next.call(action))
/// };
/// # let _ = redundant;
/// ```
pub trait Middleware: Send + 'static {
    /// Bind the middleware to its store
    fn bind(self: Box<Self>, store: StoreHandle) -> Transformer;

    /// Name used in logs
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F, T> Middleware for F
where
    F: FnOnce(StoreHandle) -> T + Send + 'static,
    T: FnOnce(Dispatch) -> Dispatch + Send + 'static,
{
    fn bind(self: Box<Self>, store: StoreHandle) -> Transformer {
        Box::new((*self)(store))
    }
}

/// Fold transformers right-to-left around `base`
///
/// The first transformer becomes the outermost stage: `T1(T2(...Tn(base)))`.
/// With no transformers the result is `base` itself.
pub fn compose(base: Dispatch, transformers: Vec<Transformer>) -> Dispatch {
    transformers
        .into_iter()
        .rev()
        .fold(base, |next, transform| transform(next))
}

/// An ordered list of middlewares, composed once into a single dispatch
#[derive(Default)]
pub struct Pipeline {
    middlewares: Vec<Box<dyn Middleware>>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Append a middleware (registration order is wrapping order)
    pub fn push(&mut self, middleware: impl Middleware) {
        self.middlewares.push(Box::new(middleware));
    }

    /// Append an already boxed middleware
    pub fn push_boxed(&mut self, middleware: Box<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    /// Number of registered middlewares
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Check if no middleware is registered
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Bind every middleware to `store` in registration order, then compose around `base`
    pub fn build(self, base: Dispatch, store: &StoreHandle) -> Dispatch {
        let transformers = self
            .middlewares
            .into_iter()
            .enumerate()
            .map(|(position, middleware)| {
                debug!(position, middleware = middleware.name(), "binding middleware");
                middleware.bind(store.clone())
            })
            .collect();

        compose(base, transformers)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.middlewares.iter().map(|m| m.name()))
            .finish()
    }
}
