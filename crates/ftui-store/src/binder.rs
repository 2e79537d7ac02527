#![forbid(unsafe_code)]

//! Stable method binding: same-identity handles, always-latest behavior.
//!
//! A component supplies a fresh [`MethodMap`] on every render (its closures
//! typically capture render-scoped values), but callers holding the bound
//! handles must never see those handles change identity. The binder splits
//! identity from behavior with one mutable indirection cell per name: the
//! [`Bound`] mapping and its [`Action`] handles are created once and never
//! replaced, while every rebind overwrites the closures *inside* the cells.
//!
//! # Invariants
//!
//! 1. [`MethodBinder::bound`] returns the identical [`Bound`] (pointer
//!    equality) for the life of the binder.
//! 2. Calling a bound name runs the closure supplied by the most recent
//!    (re)bind, with the payload and return value forwarded unchanged.
//! 3. The key set is fixed at construction; a rebind with a different key
//!    set fails with [`BindError::KeySetMismatch`] and changes nothing.
//!
//! # Failure Modes
//!
//! - Calling a never-registered name: [`BindError::UnknownMethod`].
//! - A bound closure panicking: propagates to the caller; the binder itself
//!   stays usable.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{trace, warn};

use crate::error::BindError;
use crate::host::HookCx;
use crate::registry::NamedRegistry;

/// A boxed method taking one payload and returning one value.
///
/// All methods of one binder share the payload type `A` and return type `R`;
/// multi-argument methods take a tuple payload.
pub type MethodFn<A, R> = Box<dyn FnMut(A) -> R>;

/// Named collection of methods supplied to [`MethodBinder`] each render.
pub type MethodMap<A, R> = NamedRegistry<MethodFn<A, R>>;

/// Box a closure as a [`MethodFn`].
pub fn method<A, R>(f: impl FnMut(A) -> R + 'static) -> MethodFn<A, R> {
    Box::new(f)
}

/// One name's indirection cell: stable `Rc`, replaceable contents.
struct Entry<A, R> {
    name: &'static str,
    cell: Rc<RefCell<MethodFn<A, R>>>,
}

// ─── Bound ───────────────────────────────────────────────────────────────────

/// The stable mapping of bound methods handed back to callers.
///
/// Cloning is cheap and preserves identity: all clones from one binder
/// compare equal under [`Bound::ptr_eq`].
pub struct Bound<A, R> {
    entries: Rc<Vec<Entry<A, R>>>,
}

impl<A, R> Clone for Bound<A, R> {
    fn clone(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
        }
    }
}

impl<A, R> Bound<A, R> {
    /// Invoke the current closure bound under `name`.
    ///
    /// The payload is forwarded as-is and the closure's return value comes
    /// back unchanged.
    pub fn call(&self, name: &str, args: A) -> Result<R, BindError> {
        let entry = self.find(name).ok_or_else(|| BindError::UnknownMethod {
            name: name.to_owned(),
        })?;
        trace!(method = name, "bound call");
        let mut f = entry.cell.borrow_mut();
        Ok((*f)(args))
    }

    /// A per-name stable handle, or `None` for an unregistered name.
    #[must_use]
    pub fn action(&self, name: &str) -> Option<Action<A, R>> {
        self.find(name).map(|entry| Action {
            name: entry.name,
            cell: Rc::clone(&entry.cell),
        })
    }

    /// Bound names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Number of bound methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no methods are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identity comparison: true iff both handles came from the same binder.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.entries, &b.entries)
    }

    fn find(&self, name: &str) -> Option<&Entry<A, R>> {
        self.entries.iter().find(|e| e.name == name)
    }
}

impl<A, R> std::fmt::Debug for Bound<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bound")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

// ─── Action ──────────────────────────────────────────────────────────────────

/// Stable single-method handle.
///
/// Unlike [`Bound::call`], an `Action` cannot name an unknown method, so
/// invocation is infallible at the binding layer.
pub struct Action<A, R> {
    name: &'static str,
    cell: Rc<RefCell<MethodFn<A, R>>>,
}

impl<A, R> Clone for Action<A, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<A, R> Action<A, R> {
    /// Invoke the current closure behind this handle.
    pub fn call(&self, args: A) -> R {
        let mut f = self.cell.borrow_mut();
        (*f)(args)
    }

    /// The name this handle was bound under.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<A, R> std::fmt::Debug for Action<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

// ─── MethodBinder ────────────────────────────────────────────────────────────

/// Persisted binder record for one component instance.
///
/// Construction fixes the key set and creates the indirection cells;
/// [`rebind`](Self::rebind) refreshes behavior without touching identity.
pub struct MethodBinder<A, R> {
    bound: Bound<A, R>,
}

impl<A, R> MethodBinder<A, R> {
    /// Build a binder from the initial method map, fixing its key set.
    #[must_use]
    pub fn new(methods: MethodMap<A, R>) -> Self {
        let entries = methods
            .into_entries()
            .into_iter()
            .map(|(name, f)| Entry {
                name,
                cell: Rc::new(RefCell::new(f)),
            })
            .collect();
        Self {
            bound: Bound {
                entries: Rc::new(entries),
            },
        }
    }

    /// Replace every entry's closure with the latest supplied one.
    ///
    /// Fails with [`BindError::KeySetMismatch`] if `methods` registers a
    /// different name set than construction did; no entry is replaced in
    /// that case. On success, returns the same [`Bound`] as every other
    /// call.
    pub fn rebind(&mut self, methods: MethodMap<A, R>) -> Result<Bound<A, R>, BindError> {
        if !self.same_keys(&methods) {
            let expected = self.bound.names().collect::<Vec<_>>().join(", ");
            let got = methods.key_list();
            warn!(%expected, %got, "rebind rejected: method set changed");
            return Err(BindError::KeySetMismatch { expected, got });
        }
        for (name, f) in methods.into_entries() {
            if let Some(entry) = self.bound.find(name) {
                *entry.cell.borrow_mut() = f;
            }
        }
        trace!(methods = self.bound.len(), "method map rebound");
        Ok(self.bound.clone())
    }

    /// The stable bound mapping for this binder.
    #[must_use]
    pub fn bound(&self) -> Bound<A, R> {
        self.bound.clone()
    }

    fn same_keys(&self, methods: &MethodMap<A, R>) -> bool {
        self.bound.len() == methods.len()
            && methods.names().all(|name| self.bound.find(name).is_some())
    }
}

impl<A, R> std::fmt::Debug for MethodBinder<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodBinder")
            .field("names", &self.bound.names().collect::<Vec<_>>())
            .finish()
    }
}

// ─── use_methods ─────────────────────────────────────────────────────────────

/// Per-render entry point: bind `methods` for the component instance
/// behind `cx`.
///
/// The first call for an instance constructs the binder in a persisted
/// cell; every call (first and later) installs the freshly supplied
/// closures and returns the identical [`Bound`].
pub fn use_methods<A: 'static, R: 'static>(
    cx: &HookCx,
    methods: MethodMap<A, R>,
) -> Result<Bound<A, R>, BindError> {
    let record: Rc<RefCell<Option<MethodBinder<A, R>>>> = cx.use_cell(|| None);
    let mut record = record.borrow_mut();
    match record.as_mut() {
        None => {
            let binder = MethodBinder::new(methods);
            let bound = binder.bound();
            *record = Some(binder);
            Ok(bound)
        }
        Some(binder) => binder.rebind(methods),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
