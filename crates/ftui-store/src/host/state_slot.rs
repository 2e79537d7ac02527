#![forbid(unsafe_code)]

//! Reactive state slot: committed value plus an async-effective update queue.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

/// Shared interior for [`StateSlot`]. Owned by a persisted cell in the
/// component's [`HookCx`](super::HookCx).
pub(crate) struct SlotInner<S> {
    /// The value observed by the current render pass.
    committed: S,
    /// Update queued since the last pass, if any. Last write wins.
    pending: Option<S>,
}

impl<S> SlotInner<S> {
    pub(crate) fn new(initial: S) -> Self {
        Self {
            committed: initial,
            pending: None,
        }
    }

    /// Commit a queued update. Called at the start of a render pass.
    pub(crate) fn flush(&mut self) {
        if let Some(next) = self.pending.take() {
            self.committed = next;
        }
    }
}

/// Handle to a reactively-observed state value.
///
/// Cloning a `StateSlot` yields a second handle to the **same** slot.
/// Reads see the value committed as of the current render pass;
/// [`request_update`](Self::request_update) queues a value that becomes
/// visible on the next pass and signals the host scheduler.
pub struct StateSlot<S> {
    inner: Rc<RefCell<SlotInner<S>>>,
    request_render: Rc<dyn Fn()>,
}

impl<S> Clone for StateSlot<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            request_render: Rc::clone(&self.request_render),
        }
    }
}

impl<S> StateSlot<S> {
    pub(crate) fn new(inner: Rc<RefCell<SlotInner<S>>>, request_render: Rc<dyn Fn()>) -> Self {
        Self {
            inner,
            request_render,
        }
    }

    /// Access the committed value by reference.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.borrow().committed)
    }

    /// Queue `next` as the slot's value and signal the host scheduler.
    ///
    /// The committed value is unchanged until the next render pass begins;
    /// a second update queued before then replaces the first.
    pub fn request_update(&self, next: S) {
        self.inner.borrow_mut().pending = Some(next);
        trace!("state update queued");
        (self.request_render)();
    }

    /// Whether an update is queued but not yet committed.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }
}

impl<S: Clone> StateSlot<S> {
    /// The value committed as of the current render pass.
    #[must_use]
    pub fn get(&self) -> S {
        self.inner.borrow().committed.clone()
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for StateSlot<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("StateSlot")
            .field("committed", &inner.committed)
            .field("pending", &inner.pending)
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
