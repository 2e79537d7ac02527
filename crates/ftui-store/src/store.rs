#![forbid(unsafe_code)]

//! Draft-based reactive state store.
//!
//! A store couples one reactively-observed state value with a named map of
//! reducers. `use_store` hands back the current state snapshot plus an
//! [`Actions`] mapping whose identity never changes for the component
//! instance, while every dispatch runs the *latest* reducer against the
//! *current* state — including state committed by earlier dispatches in the
//! same turn that the UI has not rendered yet.
//!
//! ```text
//! render:   (state, actions) = use_store(cx, engine, descriptor)
//! dispatch: actions.dispatch("inc", ())  → reducer runs on a draft
//!                                        → record state advances
//!                                        → one re-render request queued
//! ```
//!
//! # Invariants
//!
//! 1. `actions` is identity-stable for the instance lifetime, no matter how
//!    often the reducer map changes between renders.
//! 2. Each dispatch computes from the record's state at the moment it runs,
//!    so same-turn dispatches compose sequentially even though renders lag.
//! 3. A failed dispatch commits nothing and requests no re-render.
//! 4. The action key set is fixed on first use; later renders must supply
//!    the same reducer names.
//!
//! Reducers must not dispatch to their own store reentrantly; dispatches
//! are complete-before-next value computations (single-threaded host).

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::binder::{Bound, MethodBinder, MethodFn, MethodMap};
use crate::error::{ReducerError, StoreError};
use crate::host::{HookCx, StateSlot};
use crate::produce::{CloneOnWrite, DraftEngine, Produced};
use crate::registry::NamedRegistry;

/// A boxed reducer: edits a draft of `S` (or replaces it), given one
/// dispatch payload `A`.
pub type Reducer<S, A> = Box<dyn FnMut(&mut S, A) -> Result<Produced<S>, ReducerError>>;

/// Named collection of reducers for one store.
pub type ReducerMap<S, A> = NamedRegistry<Reducer<S, A>>;

/// Box a closure as a [`Reducer`].
pub fn reducer<S, A>(
    f: impl FnMut(&mut S, A) -> Result<Produced<S>, ReducerError> + 'static,
) -> Reducer<S, A> {
    Box::new(f)
}

// ─── Definition helpers ──────────────────────────────────────────────────────

/// Store definition: initial state plus reducer map.
///
/// Pure data; all runtime behavior lives in [`use_store_with`].
pub struct StoreDescriptor<S, A> {
    /// Initial state for the first render of an instance.
    pub state: S,
    /// Reducers, possibly re-created with fresh captures on every render.
    pub reducers: ReducerMap<S, A>,
}

/// First half of the two-step definition chain started by [`define_state`].
pub struct StateBuilder<S> {
    state: S,
}

impl<S> StateBuilder<S> {
    /// Attach the reducer map, completing the descriptor.
    #[must_use]
    pub fn define_reducers<A>(self, reducers: ReducerMap<S, A>) -> StoreDescriptor<S, A> {
        StoreDescriptor {
            state: self.state,
            reducers,
        }
    }
}

/// Start a chained store definition from the initial state.
#[must_use]
pub fn define_state<S>(state: S) -> StateBuilder<S> {
    StateBuilder { state }
}

/// Identity pass-through for a fully-formed descriptor.
///
/// Exists so call sites have one place where the descriptor shape is
/// checked against the store's expectations.
#[must_use]
pub fn define_store<S, A>(store: StoreDescriptor<S, A>) -> StoreDescriptor<S, A> {
    store
}

// ─── Store record ────────────────────────────────────────────────────────────

/// Persisted per-instance record: always-current state and reducers.
struct StoreRecord<S, A> {
    /// Latest committed state, including commits still pending a render.
    state: S,
    /// Latest supplied reducers; overwritten every render.
    reducers: ReducerMap<S, A>,
    /// Draft engine capability; shared by all dispatch closures.
    engine: Rc<dyn DraftEngine<S>>,
}

/// One persisted store instance: the record plus its dispatch binder.
struct StoreInstance<S, A> {
    record: Rc<RefCell<StoreRecord<S, A>>>,
    binder: MethodBinder<A, Result<(), StoreError>>,
}

// ─── Actions ─────────────────────────────────────────────────────────────────

/// Identity-stable dispatch mapping returned by [`use_store_with`].
pub struct Actions<A> {
    bound: Bound<A, Result<(), StoreError>>,
}

impl<A> Clone for Actions<A> {
    fn clone(&self) -> Self {
        Self {
            bound: self.bound.clone(),
        }
    }
}

impl<A> Actions<A> {
    /// Dispatch the action registered under `name` with `args`.
    ///
    /// On success the store's record has advanced and exactly one re-render
    /// request has been queued. On failure nothing changed.
    pub fn dispatch(&self, name: &str, args: A) -> Result<(), StoreError> {
        match self.bound.call(name, args) {
            Ok(result) => result,
            Err(err) => Err(err.into()),
        }
    }

    /// Registered action names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bound.names()
    }

    /// Number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Whether no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Identity comparison: true iff both came from the same store instance.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Bound::ptr_eq(&a.bound, &b.bound)
    }
}

impl<A> std::fmt::Debug for Actions<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actions")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Run one dispatch against the persisted record.
///
/// Looks up the current reducer, runs it through the draft engine with the
/// payload forwarded after the draft, commits the produced state into the
/// record, and queues a re-render carrying that state.
fn run_dispatch<S: Clone, A>(
    name: &'static str,
    record: &Rc<RefCell<StoreRecord<S, A>>>,
    slot: &StateSlot<S>,
    args: A,
) -> Result<(), StoreError> {
    trace!(action = name, "dispatch");
    let next = {
        let mut guard = record.borrow_mut();
        let StoreRecord {
            state,
            reducers,
            engine,
        } = &mut *guard;

        let reduce = reducers
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownAction {
                name: name.to_owned(),
            })?;

        let mut payload = Some(args);
        let next = engine
            .apply(state, &mut |draft| {
                let args = payload
                    .take()
                    .ok_or_else(|| ReducerError::from("draft engine ran the reducer twice"))?;
                reduce(draft, args)
            })
            .map_err(|err| {
                warn!(action = name, error = %err, "dispatch failed; state unchanged");
                StoreError::Reducer(err)
            })?;

        *state = next.clone();
        next
    };
    debug!(action = name, "state committed, re-render queued");
    slot.request_update(next);
    Ok(())
}

// ─── use_store ───────────────────────────────────────────────────────────────

/// [`use_store_with`] using the baseline [`CloneOnWrite`] draft engine.
pub fn use_store<S, A>(
    cx: &HookCx,
    store: StoreDescriptor<S, A>,
) -> Result<(S, Actions<A>), StoreError>
where
    S: Clone + 'static,
    A: 'static,
{
    use_store_with(cx, CloneOnWrite, store)
}

/// Per-render store entry point for the component instance behind `cx`.
///
/// First use: observes `store.state` reactively, persists the store record,
/// and builds the dispatch binder exactly once from the reducer names.
/// Every use: refreshes the record with the latest observed state and the
/// latest reducers, then returns `(snapshot, actions)` where `actions` is
/// the same identity as on every other render.
///
/// Fails with [`StoreError::ActionSetMismatch`] when a later render
/// supplies a reducer map whose key set differs from the first render's.
pub fn use_store_with<S, A, E>(
    cx: &HookCx,
    engine: E,
    store: StoreDescriptor<S, A>,
) -> Result<(S, Actions<A>), StoreError>
where
    S: Clone + 'static,
    A: 'static,
    E: DraftEngine<S> + 'static,
{
    let StoreDescriptor { state, reducers } = store;

    let slot = cx.use_state(|| state);
    let snapshot = slot.get();

    let instance: Rc<RefCell<Option<StoreInstance<S, A>>>> = cx.use_cell(|| None);
    let mut instance = instance.borrow_mut();

    match instance.as_mut() {
        None => {
            let record = Rc::new(RefCell::new(StoreRecord {
                state: snapshot.clone(),
                reducers,
                engine: Rc::new(engine),
            }));

            // Build the dispatch trampolines exactly once; their identity
            // is the Actions identity for this instance's whole lifetime.
            let names: Vec<&'static str> = record.borrow().reducers.names().collect();
            let mut methods: MethodMap<A, Result<(), StoreError>> = MethodMap::new();
            for name in names {
                let record = Rc::clone(&record);
                let slot = slot.clone();
                let dispatch: MethodFn<A, Result<(), StoreError>> =
                    Box::new(move |args| run_dispatch(name, &record, &slot, args));
                methods.insert(name, dispatch);
            }

            let binder = MethodBinder::new(methods);
            let actions = Actions {
                bound: binder.bound(),
            };
            debug!(actions = actions.len(), "store initialized");
            *instance = Some(StoreInstance { record, binder });
            Ok((snapshot, actions))
        }
        Some(existing) => {
            {
                let mut record = existing.record.borrow_mut();
                if !record.reducers.same_keys(&reducers) {
                    let expected = record.reducers.key_list();
                    let got = reducers.key_list();
                    warn!(%expected, %got, "render rejected: reducer set changed");
                    return Err(StoreError::ActionSetMismatch { expected, got });
                }
                record.state = snapshot.clone();
                record.reducers = reducers;
            }
            Ok((
                snapshot,
                Actions {
                    bound: existing.binder.bound(),
                },
            ))
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
