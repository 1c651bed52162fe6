/// The store
///
/// A store owns the state tree, the root reducer and the change listeners,
/// and exposes a single dispatch entry point built from its middleware
/// pipeline. State sits behind a `RwLock`: each reducer call is atomic with
/// respect to other dispatches, and no lock is held while middlewares or
/// listeners run, so dispatch may be re-entered from any of them.

mod handle;
mod reducer;
mod state;

pub use handle::StoreHandle;
pub use reducer::{NoopReducer, Reducer};
pub use state::State;
pub(crate) use state::split_path;

use serde_json::Value;
use std::fmt;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use tracing::{debug, info, trace};

use crate::action::{Action, ActionRecord};
use crate::pipeline::{Dispatch, DispatchError, Middleware, Pipeline};

/// Change listener: receives the action type that caused the change (none for
/// direct writes) and a snapshot of the new state
pub type Listener = Arc<dyn Fn(Option<&str>, &State) + Send + Sync + 'static>;

/// Identifies a listener registered with [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// State shared between a store and its handles
pub(crate) struct Shared {
    state: RwLock<State>,
    reducer: Box<dyn Reducer>,
    entry: OnceLock<Dispatch>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
    /// Committed changes awaiting delivery, in commit order
    pending: Mutex<VecDeque<(Option<String>, State)>>,
    delivering: AtomicBool,
}

/// Clears the delivery flag, even if a listener panics
struct DeliveryGuard<'a>(&'a AtomicBool);

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Shared {
    /// The composed dispatch, once the pipeline has been built
    fn entry(&self) -> Result<Dispatch, DispatchError> {
        self.entry.get().cloned().ok_or(DispatchError::NotReady)
    }

    fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write<S: AsRef<str>>(&self, path: &[S], value: Value) -> Result<Option<Value>, DispatchError> {
        let previous = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let previous = state.set(path, value)?;
            self.enqueue(None, &state);
            previous
        };

        self.notify();
        Ok(previous)
    }

    /// Root reducer invocation: the innermost stage of every pipeline
    fn reduce(&self, action: &ActionRecord) -> Result<(), DispatchError> {
        trace!(action = %action.action_type(), "reducing");

        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            self.reducer.reduce(action, &mut state)?;
            self.enqueue(Some(action.action_type()), &state);
        }

        self.notify();
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn has_listeners(&self) -> bool {
        !self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Queue a snapshot for the listeners. Called with the state write lock
    /// held, so the queue order is the commit order.
    fn enqueue(&self, action_type: Option<&str>, state: &State) {
        if self.has_listeners() {
            self.pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back((action_type.map(str::to_string), state.clone()));
        }
    }

    fn next_pending(&self) -> Option<(Option<String>, State)> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).pop_front()
    }

    /// Deliver queued changes, one deliverer at a time
    ///
    /// Listeners are called outside every lock; they may subscribe or
    /// dispatch. A change committed while another thread (or an enclosing
    /// listener call) is delivering is picked up by that deliverer.
    fn notify(&self) {
        loop {
            if self
                .delivering
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return;
            }

            {
                let _guard = DeliveryGuard(&self.delivering);
                while let Some((action_type, state)) = self.next_pending() {
                    let listeners: Vec<Listener> = self
                        .listeners
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .iter()
                        .map(|(_, listener)| Arc::clone(listener))
                        .collect();

                    for listener in listeners {
                        listener(action_type.as_deref(), &state);
                    }
                }
            }

            // A change queued after the last pop may have seen the flag still set.
            if self
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_empty()
            {
                return;
            }
        }
    }
}

/// A Redux-style store with a middleware dispatch pipeline
///
/// # Example
/// ```
/// use helium::{ActionRecord, DispatchError, State, Store};
/// use serde_json::json;
///
/// let store = Store::new(
///     |action: &ActionRecord, state: &mut State| -> Result<(), DispatchError> {
///         if action.is("SetCoins") {
///             state.set_path("Coins", action.get("Value").cloned().unwrap_or_default())?;
///         }
///         Ok(())
///     },
///     json!({"Coins": 0}),
/// );
///
/// store.dispatch(ActionRecord::new("SetCoins").with("Value", json!(10))).unwrap();
/// assert_eq!(store.get_path("Coins"), Some(json!(10)));
/// ```
pub struct Store {
    shared: Arc<Shared>,
    middleware_count: usize,
}

impl Store {
    /// Start building a store around a reducer and an initial state
    pub fn builder(reducer: impl Reducer, initial_state: Value) -> StoreBuilder {
        StoreBuilder {
            reducer: Box::new(reducer),
            initial_state: State::from_value(initial_state),
            pipeline: Pipeline::new(),
        }
    }

    /// A store without middlewares
    pub fn new(reducer: impl Reducer, initial_state: Value) -> Self {
        Self::builder(reducer, initial_state).build()
    }

    /// Deliver an action into the pipeline
    pub fn dispatch(&self, action: impl Into<Action>) -> Result<(), DispatchError> {
        let action = action.into();
        debug!(kind = action.kind(), action = action.action_type().unwrap_or_default(), "dispatch");
        self.shared.entry()?.call(action)
    }

    /// Alias of [`Store::dispatch`]
    pub fn fire(&self, action: impl Into<Action>) -> Result<(), DispatchError> {
        self.dispatch(action)
    }

    /// A weak handle to this store
    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Get a copy of the value at a key path
    pub fn get_state<S: AsRef<str>>(&self, path: &[S]) -> Option<Value> {
        self.shared.read(|state| state.get(path).cloned())
    }

    /// Get a copy of the value at a dotted path
    pub fn get_path(&self, path: &str) -> Option<Value> {
        self.shared.read(|state| state.get_path(path).cloned())
    }

    /// Query the state with a JSONPath expression
    pub fn query(&self, query: &str) -> Result<Vec<Value>, DispatchError> {
        self.shared.read(|state| state.query(query))
    }

    /// A copy of the whole state
    pub fn snapshot(&self) -> State {
        self.shared.read(State::clone)
    }

    /// Write a value at a key path, bypassing the pipeline and the reducer
    pub fn set_state<S: AsRef<str>>(
        &self,
        path: &[S],
        value: Value,
    ) -> Result<Option<Value>, DispatchError> {
        self.shared.write(path, value)
    }

    /// Register a listener called after every committed change
    ///
    /// Changes are delivered one at a time in commit order. A change made
    /// from inside a listener is delivered after that listener returns, and
    /// under contention a dispatch may return before its change is delivered
    /// by the thread currently notifying.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Option<&str>, &State) + Send + Sync + 'static,
    {
        self.shared.subscribe(Arc::new(listener))
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.unsubscribe(id)
    }

    /// Number of middlewares in the pipeline
    pub fn middleware_count(&self) -> usize {
        self.middleware_count
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.snapshot())
            .field("middleware_count", &self.middleware_count)
            .finish()
    }
}

/// Builder collecting middlewares before the pipeline is composed
pub struct StoreBuilder {
    reducer: Box<dyn Reducer>,
    initial_state: State,
    pipeline: Pipeline,
}

impl StoreBuilder {
    /// Append a middleware. The first one registered sees every action first.
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.pipeline.push(middleware);
        self
    }

    /// Append an already boxed middleware
    pub fn middleware_boxed(mut self, middleware: Box<dyn Middleware>) -> Self {
        self.pipeline.push_boxed(middleware);
        self
    }

    /// Bind every middleware once and compose the dispatch entry point
    pub fn build(self) -> Store {
        let middleware_count = self.pipeline.len();
        let shared = Arc::new(Shared {
            state: RwLock::new(self.initial_state),
            reducer: self.reducer,
            entry: OnceLock::new(),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            pending: Mutex::new(VecDeque::new()),
            delivering: AtomicBool::new(false),
        });

        let handle = StoreHandle {
            shared: Arc::downgrade(&shared),
        };
        let dispatch = self.pipeline.build(root_dispatch(handle.clone()), &handle);
        // The lock was created just above and is never set anywhere else.
        let _ = shared.entry.set(dispatch);

        info!(middlewares = middleware_count, "store built");
        Store {
            shared,
            middleware_count,
        }
    }
}

impl fmt::Debug for StoreBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreBuilder")
            .field("initial_state", &self.initial_state)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

/// The innermost stage: hands structured actions to the reducer
fn root_dispatch(handle: StoreHandle) -> Dispatch {
    Dispatch::new(move |action| {
        let shared = handle.shared.upgrade().ok_or(DispatchError::StoreDropped)?;
        match action {
            Action::Structured(record) => shared.reduce(&record),
            callable => Err(DispatchError::UnhandledCallable {
                kind: callable.kind(),
            }),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    type Log = Arc<Mutex<Vec<String>>>;

    fn coins_reducer(action: &ActionRecord, state: &mut State) -> Result<(), DispatchError> {
        match action.action_type() {
            "SetCoins" => {
                state.set_path("Coins", action.get("Value").cloned().unwrap_or_default())?;
            }
            "AddCoin" => {
                let coins = state.get_path("Coins").and_then(Value::as_i64).unwrap_or(0);
                state.set_path("Coins", json!(coins + 1))?;
            }
            "Explode" => {
                state.set_path("HalfDone", json!(true))?;
                return Err(DispatchError::reducer("Explode", "boom"));
            }
            _ => {}
        }
        Ok(())
    }

    fn tagging(log: &Log, tag: &'static str) -> impl Middleware {
        let log = Arc::clone(log);
        move |_store: StoreHandle| {
            move |next: Dispatch| {
                Dispatch::new(move |action| {
                    log.lock().unwrap().push(tag.to_string());
                    next.call(action)
                })
            }
        }
    }

    fn swallowing() -> impl Middleware {
        |_store: StoreHandle| |_next: Dispatch| Dispatch::new(|_| Ok(()))
    }

    #[test]
    fn test_zero_middlewares_matches_reducer() {
        let store = Store::new(coins_reducer, json!({"Coins": 0}));
        let mut expected = State::from_value(json!({"Coins": 0}));

        store.dispatch(ActionRecord::new("AddCoin")).unwrap();
        coins_reducer(&ActionRecord::new("AddCoin"), &mut expected).unwrap();

        assert_eq!(store.snapshot(), expected);
        assert_eq!(store.middleware_count(), 0);
    }

    #[test]
    fn test_forwarding_middlewares_run_in_registration_order() {
        let log: Log = Arc::default();
        let reduced = Arc::new(Mutex::new(Vec::new()));
        let reducer = {
            let log = Arc::clone(&log);
            let reduced = Arc::clone(&reduced);
            move |action: &ActionRecord, _state: &mut State| -> Result<(), DispatchError> {
                log.lock().unwrap().push("reducer".to_string());
                reduced.lock().unwrap().push(action.clone());
                Ok(())
            }
        };

        let store = Store::builder(reducer, json!({}))
            .middleware(tagging(&log, "m1"))
            .middleware(tagging(&log, "m2"))
            .middleware(tagging(&log, "m3"))
            .build();

        let action = ActionRecord::new("AwesomeAction").with("IsAwesome", json!(true));
        store.dispatch(action.clone()).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["m1", "m2", "m3", "reducer"]);
        assert_eq!(*reduced.lock().unwrap(), vec![action]);
    }

    #[test]
    fn test_swallowing_middleware_hides_action_from_later_stages() {
        let log: Log = Arc::default();
        let store = Store::builder(coins_reducer, json!({"Coins": 0}))
            .middleware(tagging(&log, "before"))
            .middleware(swallowing())
            .middleware(tagging(&log, "after"))
            .build();

        store.dispatch(ActionRecord::new("AddCoin")).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["before"]);
        assert_eq!(store.get_path("Coins"), Some(json!(0)));
    }

    #[test]
    fn test_factories_bound_once_in_order() {
        let bound: Log = Arc::default();
        let factory = |name: &'static str| {
            let bound = Arc::clone(&bound);
            move |store: StoreHandle| {
                assert!(store.is_alive());
                bound.lock().unwrap().push(name.to_string());
                |next: Dispatch| next
            }
        };

        let store = Store::builder(coins_reducer, json!({}))
            .middleware(factory("first"))
            .middleware(factory("second"))
            .build();
        store.dispatch(ActionRecord::new("AddCoin")).unwrap();
        store.dispatch(ActionRecord::new("AddCoin")).unwrap();

        assert_eq!(*bound.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_dispatch_during_binding_is_not_ready() {
        let seen = Arc::new(Mutex::new(None));
        let seen_in_factory = Arc::clone(&seen);
        let _store = Store::builder(coins_reducer, json!({}))
            .middleware(move |store: StoreHandle| {
                *seen_in_factory.lock().unwrap() = Some(store.dispatch(ActionRecord::new("AddCoin")));
                |next: Dispatch| next
            })
            .build();

        assert_eq!(*seen.lock().unwrap(), Some(Err(DispatchError::NotReady)));
    }

    #[test]
    fn test_callable_reaching_reducer_is_an_error() {
        let store = Store::new(coins_reducer, json!({}));
        let err = store.dispatch(Action::thunk(|_| Ok(()))).unwrap_err();
        assert_eq!(err, DispatchError::UnhandledCallable { kind: "thunk" });
    }

    #[test]
    fn test_reducer_error_keeps_earlier_mutations() {
        let store = Store::new(coins_reducer, json!({}));
        let err = store.dispatch(ActionRecord::new("Explode")).unwrap_err();

        assert_eq!(err, DispatchError::reducer("Explode", "boom"));
        assert_eq!(store.get_path("HalfDone"), Some(json!(true)));
    }

    #[test]
    fn test_middleware_state_writes_survive_later_failure() {
        let store = Store::builder(coins_reducer, json!({}))
            .middleware(|store: StoreHandle| {
                move |next: Dispatch| {
                    Dispatch::new(move |action| {
                        store.set_state(&["Seen"], json!(true))?;
                        next.call(action)
                    })
                }
            })
            .middleware(|_store: StoreHandle| {
                |_next: Dispatch| Dispatch::new(|_| Err(DispatchError::custom("rejected")))
            })
            .build();

        let err = store.dispatch(ActionRecord::new("AddCoin")).unwrap_err();
        assert_eq!(err, DispatchError::custom("rejected"));
        assert_eq!(store.get_path("Seen"), Some(json!(true)));
    }

    #[test]
    fn test_reentrant_dispatch_starts_at_outermost_middleware() {
        let log: Log = Arc::default();
        let redispatching = |store: StoreHandle| {
            move |next: Dispatch| {
                Dispatch::new(move |action| {
                    if action.action_type() == Some("Double") {
                        store.dispatch(ActionRecord::new("AddCoin"))?;
                        return store.dispatch(ActionRecord::new("AddCoin"));
                    }
                    next.call(action)
                })
            }
        };

        let store = Store::builder(coins_reducer, json!({"Coins": 0}))
            .middleware(tagging(&log, "outer"))
            .middleware(redispatching)
            .build();

        store.dispatch(ActionRecord::new("Double")).unwrap();

        assert_eq!(store.get_path("Coins"), Some(json!(2)));
        assert_eq!(*log.lock().unwrap(), vec!["outer", "outer", "outer"]);
    }

    #[test]
    fn test_listeners_see_committed_changes() {
        let store = Store::new(coins_reducer, json!({"Coins": 0}));
        let changes: Arc<Mutex<Vec<(Option<String>, Value)>>> = Arc::default();
        let id = {
            let changes = Arc::clone(&changes);
            store.subscribe(move |action, state| {
                changes
                    .lock()
                    .unwrap()
                    .push((action.map(str::to_string), state.get_path("Coins").cloned().unwrap_or_default()));
            })
        };

        store.dispatch(ActionRecord::new("AddCoin")).unwrap();
        store.set_state(&["Coins"], json!(10)).unwrap();
        let _ = store.dispatch(ActionRecord::new("Explode"));
        assert!(store.unsubscribe(id));
        store.dispatch(ActionRecord::new("AddCoin")).unwrap();

        assert_eq!(
            *changes.lock().unwrap(),
            vec![(Some("AddCoin".to_string()), json!(1)), (None, json!(10))]
        );
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_listener_may_dispatch() {
        let store = Store::new(coins_reducer, json!({"Coins": 0}));
        let handle = store.handle();
        store.subscribe(move |action, _state| {
            if action == Some("SetCoins") {
                handle.dispatch(ActionRecord::new("AddCoin")).unwrap();
            }
        });

        store
            .dispatch(ActionRecord::new("SetCoins").with("Value", json!(5)))
            .unwrap();
        assert_eq!(store.get_path("Coins"), Some(json!(6)));
    }

    #[test]
    fn test_nested_change_delivered_after_listener_returns() {
        let store = Store::new(coins_reducer, json!({"Coins": 0}));
        let seen: Arc<Mutex<Vec<(String, Value)>>> = Arc::default();
        let handle = store.handle();
        {
            let seen = Arc::clone(&seen);
            store.subscribe(move |action, state| {
                let action = action.unwrap_or_default().to_string();
                if action == "SetCoins" {
                    handle.dispatch(ActionRecord::new("AddCoin")).unwrap();
                }
                let coins = state.get_path("Coins").cloned().unwrap_or_default();
                seen.lock().unwrap().push((action, coins));
            });
        }

        store
            .dispatch(ActionRecord::new("SetCoins").with("Value", json!(5)))
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("SetCoins".to_string(), json!(5)), ("AddCoin".to_string(), json!(6))]
        );
    }

    #[test]
    fn test_concurrent_changes_reach_listeners_in_commit_order() {
        let store = Store::new(coins_reducer, json!({"Coins": 0}));
        let seen: Arc<Mutex<Vec<i64>>> = Arc::default();
        {
            let seen = Arc::clone(&seen);
            store.subscribe(move |_action, state| {
                let coins = state.get_path("Coins").and_then(Value::as_i64).unwrap_or(-1);
                seen.lock().unwrap().push(coins);
            });
        }

        thread::scope(|scope| {
            for _ in 0..4 {
                let handle = store.handle();
                scope.spawn(move || {
                    for _ in 0..50 {
                        handle.dispatch(ActionRecord::new("AddCoin")).unwrap();
                    }
                });
            }
        });

        assert_eq!(*seen.lock().unwrap(), (1..=200).collect::<Vec<i64>>());
    }

    #[test]
    fn test_get_state_by_key_path() {
        let store = Store::new(coins_reducer, json!({"GuiData": {"Coins": 3}}));

        assert_eq!(store.get_state(&["GuiData", "Coins"]), Some(json!(3)));
        assert_eq!(store.get_state(&["GuiData", "Gems"]), None);
        assert_eq!(store.get_state::<&str>(&[]), Some(json!({"GuiData": {"Coins": 3}})));
    }

    #[test]
    fn test_thunk_reads_state_through_handle() {
        let store = Store::builder(coins_reducer, json!({"GuiData": {"Coins": 3}, "items": [1, 2]}))
            .middleware(crate::middleware::ThunkMiddleware::new())
            .build();
        let read = Arc::new(Mutex::new(None));

        {
            let read = Arc::clone(&read);
            store
                .dispatch(Action::thunk(move |store| {
                    let coins = store.get_state(&["GuiData", "Coins"])?;
                    let items = store.query("$.items[*]")?;
                    let whole = store.snapshot()?;
                    *read.lock().unwrap() = Some((coins, items, whole.into_value()));
                    Ok(())
                }))
                .unwrap();
        }

        assert_eq!(
            read.lock().unwrap().take(),
            Some((
                Some(json!(3)),
                vec![json!(1), json!(2)],
                json!({"GuiData": {"Coins": 3}, "items": [1, 2]})
            ))
        );
    }

    #[test]
    fn test_query_state() {
        let store = Store::new(coins_reducer, json!({"items": [{"id": 1}, {"id": 2}]}));

        assert_eq!(store.query("$.items[*]").unwrap(), vec![json!({"id": 1}), json!({"id": 2})]);
        assert_eq!(store.query("$.items[*].id").unwrap(), vec![json!(1), json!(2)]);
        assert!(store.query("$.missing").unwrap().is_empty());
        assert!(matches!(store.query("items["), Err(DispatchError::Query { .. })));
    }

    #[test]
    fn test_handle_subscribe_and_write() {
        let store = Store::new(coins_reducer, json!({}));
        let handle = store.handle();
        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::default();
        {
            let seen = Arc::clone(&seen);
            handle
                .subscribe(move |action, _state| seen.lock().unwrap().push(action.map(str::to_string)))
                .unwrap();
        }

        assert_eq!(handle.set_state(&["Coins"], json!(1)), Ok(None));
        handle.dispatch(ActionRecord::new("AddCoin")).unwrap();

        assert_eq!(handle.get_path("Coins"), Ok(Some(json!(2))));
        assert_eq!(*seen.lock().unwrap(), vec![None, Some("AddCoin".to_string())]);
    }

    #[test]
    fn test_handle_after_drop() {
        let store = Store::new(coins_reducer, json!({"Coins": 1}));
        let handle = store.handle();
        assert!(handle.is_alive());
        drop(store);

        assert!(!handle.is_alive());
        assert_eq!(
            handle.dispatch(ActionRecord::new("AddCoin")),
            Err(DispatchError::StoreDropped)
        );
        assert_eq!(handle.get_path("Coins"), Err(DispatchError::StoreDropped));
        assert_eq!(handle.get_state(&["Coins"]), Err(DispatchError::StoreDropped));
        assert_eq!(handle.query("$.Coins"), Err(DispatchError::StoreDropped));
        assert_eq!(handle.snapshot(), Err(DispatchError::StoreDropped));
        assert_eq!(
            handle.set_state(&["Coins"], json!(2)),
            Err(DispatchError::StoreDropped)
        );
        assert_eq!(
            handle.subscribe(|_action, _state| {}),
            Err(DispatchError::StoreDropped)
        );
    }

    #[test]
    fn test_concurrent_dispatch_from_threads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = {
            let calls = Arc::clone(&calls);
            move |_store: StoreHandle| {
                move |next: Dispatch| {
                    Dispatch::new(move |action| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        next.call(action)
                    })
                }
            }
        };
        let store = Store::builder(coins_reducer, json!({"Coins": 0}))
            .middleware(counting)
            .build();

        thread::scope(|scope| {
            for _ in 0..8 {
                let handle = store.handle();
                scope.spawn(move || {
                    for _ in 0..25 {
                        handle.dispatch(ActionRecord::new("AddCoin")).unwrap();
                    }
                });
            }
        });

        assert_eq!(store.get_path("Coins"), Some(json!(200)));
        assert_eq!(calls.load(Ordering::SeqCst), 200);
    }

    #[test]
    fn test_boxed_middleware() {
        let log: Log = Arc::default();
        let boxed: Box<dyn Middleware> = Box::new(tagging(&log, "boxed"));
        let store = Store::builder(coins_reducer, json!({}))
            .middleware_boxed(boxed)
            .build();

        store.dispatch(ActionRecord::new("AddCoin")).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["boxed"]);
    }
}
