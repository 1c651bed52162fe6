/// Action types
///
/// An action is either a structured record or a callable submitted in its
/// place. Middlewares match on the variant instead of probing the value.

mod creator;
mod record;

pub use creator::ActionCreator;
pub use record::{ACTION_TYPE_KEY, ActionRecord};
pub(crate) use record::type_name;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::pipeline::DispatchError;
use crate::store::StoreHandle;

/// Future returned by an async task action
pub type TaskFuture = Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'static>>;

/// A synchronous callable dispatched in place of a record
pub type Thunk = Box<dyn FnOnce(StoreHandle) -> Result<(), DispatchError> + Send + 'static>;

/// An asynchronous callable dispatched in place of a record
pub type Task = Box<dyn FnOnce(StoreHandle) -> TaskFuture + Send + 'static>;

/// A value submitted to a dispatch pipeline
pub enum Action {
    /// A plain record for the reducer
    Structured(ActionRecord),
    /// A function invoked with the store handle (`dispatch` + `get_state`)
    Thunk(Thunk),
    /// An async function, only runnable by a spawning middleware
    Task(Task),
}

impl Action {
    /// Wrap a closure as a thunk action
    ///
    /// # Example
    /// ```
    /// use helium::{Action, ActionRecord};
    /// use serde_json::json;
    ///
    /// let add_coins = Action::thunk(|store| {
    ///     store.dispatch(ActionRecord::new("SetCoins").with("Value", json!(42)))
    /// });
    /// assert_eq!(add_coins.kind(), "thunk");
    /// ```
    pub fn thunk<F>(f: F) -> Self
    where
        F: FnOnce(StoreHandle) -> Result<(), DispatchError> + Send + 'static,
    {
        Self::Thunk(Box::new(f))
    }

    /// Wrap an async closure as a task action
    pub fn task<F, Fut>(f: F) -> Self
    where
        F: FnOnce(StoreHandle) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), DispatchError>> + Send + 'static,
    {
        Self::Task(Box::new(move |store| Box::pin(f(store))))
    }

    /// Short variant name, used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Structured(_) => "record",
            Self::Thunk(_) => "thunk",
            Self::Task(_) => "task",
        }
    }

    /// The discriminator, for structured actions
    pub fn action_type(&self) -> Option<&str> {
        self.as_record().map(ActionRecord::action_type)
    }

    /// Borrow the record, for structured actions
    pub fn as_record(&self) -> Option<&ActionRecord> {
        match self {
            Self::Structured(record) => Some(record),
            _ => None,
        }
    }

    /// Check whether this action is a callable
    pub fn is_callable(&self) -> bool {
        !matches!(self, Self::Structured(_))
    }
}

impl From<ActionRecord> for Action {
    fn from(record: ActionRecord) -> Self {
        Self::Structured(record)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(record) => f.debug_tuple("Structured").field(record).finish(),
            Self::Thunk(_) => f.write_str("Thunk(<function>)"),
            Self::Task(_) => f.write_str("Task(<function>)"),
        }
    }
}
