use crate::action::ActionRecord;
use crate::pipeline::DispatchError;

use super::State;

/// The root reducer: applies one structured action to the state
///
/// The reducer runs with exclusive access to the state and may both read and
/// write it. Writes made before it returns an error are kept.
///
/// Any `Fn(&ActionRecord, &mut State) -> Result<(), DispatchError>` is a reducer:
///
/// ```
/// use helium::{ActionRecord, DispatchError, State};
///
/// fn reducer(action: &ActionRecord, state: &mut State) -> Result<(), DispatchError> {
///     if action.is("AddCoin") {
///         let coins = state.get_path("Coins").and_then(|v| v.as_i64()).unwrap_or(0);
///         state.set_path("Coins", (coins + 1).into())?;
///     }
///     Ok(())
/// }
/// # let _ = reducer;
/// ```
pub trait Reducer: Send + Sync + 'static {
    /// Apply an action
    fn reduce(&self, action: &ActionRecord, state: &mut State) -> Result<(), DispatchError>;
}

impl<F> Reducer for F
where
    F: Fn(&ActionRecord, &mut State) -> Result<(), DispatchError> + Send + Sync + 'static,
{
    fn reduce(&self, action: &ActionRecord, state: &mut State) -> Result<(), DispatchError> {
        self(action, state)
    }
}

/// A reducer that ignores every action
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReducer;

impl Reducer for NoopReducer {
    fn reduce(&self, _action: &ActionRecord, _state: &mut State) -> Result<(), DispatchError> {
        Ok(())
    }
}
