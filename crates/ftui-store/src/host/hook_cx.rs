#![forbid(unsafe_code)]

//! Per-instance persisted cell storage (`HookCx`).

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use super::state_slot::{SlotInner, StateSlot};

/// Persisted-cell capability for one component instance.
///
/// The host creates one `HookCx` per instance and passes a reference into
/// every render of that instance, calling [`begin_render`](Self::begin_render)
/// first. Cells are addressed by acquisition order: the Nth
/// [`use_cell`](Self::use_cell) call of a render always resolves to the Nth
/// slot, so a render must acquire the same cells in the same order as the
/// first render.
///
/// `on_render_request` is the host's scheduler entry point; it is invoked
/// (possibly several times per turn) whenever a state slot queues an update.
pub struct HookCx {
    slots: RefCell<Vec<Rc<dyn Any>>>,
    cursor: Cell<usize>,
    on_render_request: Rc<dyn Fn()>,
}

impl HookCx {
    /// Create a context wired to the host's render scheduler.
    #[must_use]
    pub fn new(on_render_request: impl Fn() + 'static) -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
            cursor: Cell::new(0),
            on_render_request: Rc::new(on_render_request),
        }
    }

    /// Reset slot addressing for a new render pass.
    ///
    /// The host calls this before running the component body.
    pub fn begin_render(&self) {
        self.cursor.set(0);
    }

    /// Acquire the persisted cell at the current slot position.
    ///
    /// Returns the same storage on every render of this instance; `init`
    /// runs only when the slot is first created.
    ///
    /// # Panics
    ///
    /// Panics if the slot was created with a different type on an earlier
    /// render — a hook-order contract violation in the component body.
    pub fn use_cell<T: 'static>(&self, init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
        let idx = self.cursor.get();
        self.cursor.set(idx + 1);

        let existing = self.slots.borrow().get(idx).map(Rc::clone);
        match existing {
            Some(any) => match any.downcast::<RefCell<T>>() {
                Ok(cell) => cell,
                Err(_) => panic!(
                    "persisted cell {idx} acquired with a different type than it was created with \
                     (cells must be acquired in the same order on every render)"
                ),
            },
            None => {
                let cell = Rc::new(RefCell::new(init()));
                self.slots.borrow_mut().push(Rc::clone(&cell) as Rc<dyn Any>);
                trace!(slot = idx, "persisted cell initialized");
                cell
            }
        }
    }

    /// Acquire a reactively-observed state slot.
    ///
    /// First render: the slot is created with `init()` as its committed
    /// value. Every render: any update queued since the previous pass is
    /// committed before the value is handed back, which is what makes
    /// updates visible exactly one pass after they were requested.
    pub fn use_state<S: 'static>(&self, init: impl FnOnce() -> S) -> StateSlot<S> {
        let inner = self.use_cell(|| SlotInner::new(init()));
        inner.borrow_mut().flush();
        StateSlot::new(inner, Rc::clone(&self.on_render_request))
    }

    /// Number of persisted slots created so far.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.borrow().len()
    }
}

impl std::fmt::Debug for HookCx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookCx")
            .field("slots", &self.slots.borrow().len())
            .field("cursor", &self.cursor.get())
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
