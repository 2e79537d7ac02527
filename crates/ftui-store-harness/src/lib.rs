#![forbid(unsafe_code)]

//! Deterministic host-runtime simulator for `ftui-store` tests.
//!
//! [`ComponentHost`] stands in for the real UI runtime around one component
//! instance: it owns the instance's [`HookCx`], receives render requests on
//! a dirty flag, and runs render passes on demand. Tests drive it
//! explicitly, so "what does the component observe on the next render" is a
//! plain function call instead of scheduler timing.
//!
//! ```
//! use ftui_store_harness::ComponentHost;
//! use ftui_store::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter { count: i64 }
//!
//! let host = ComponentHost::new();
//! let descriptor = || define_state(Counter { count: 0 }).define_reducers(
//!     ReducerMap::new().with("inc", reducer(|draft: &mut Counter, (): ()| {
//!         draft.count += 1;
//!         Ok(Produced::Mutated)
//!     })),
//! );
//!
//! let (_, actions) = host.render(|cx| use_store(cx, descriptor()).unwrap());
//! actions.dispatch("inc", ()).unwrap();
//! assert!(host.needs_render());
//!
//! let (state, _) = host.render(|cx| use_store(cx, descriptor()).unwrap());
//! assert_eq!(state.count, 1);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

use ftui_store::host::HookCx;

/// Simulated host runtime around one component instance.
pub struct ComponentHost {
    cx: HookCx,
    dirty: Rc<Cell<bool>>,
    renders: Cell<u64>,
}

impl ComponentHost {
    /// Create a host with a fresh component instance.
    #[must_use]
    pub fn new() -> Self {
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        let cx = HookCx::new(move || flag.set(true));
        Self {
            cx,
            dirty,
            renders: Cell::new(0),
        }
    }

    /// Run one render pass over the component body.
    ///
    /// Consumes any outstanding render request, resets hook addressing, and
    /// hands the instance's [`HookCx`] to `component`. A request issued
    /// *during* the pass (a dispatch inside the body) is kept, so
    /// [`needs_render`](Self::needs_render) reports it afterwards.
    pub fn render<R>(&self, component: impl FnOnce(&HookCx) -> R) -> R {
        self.dirty.set(false);
        self.renders.set(self.renders.get() + 1);
        trace!(pass = self.renders.get(), "render pass");
        self.cx.begin_render();
        component(&self.cx)
    }

    /// Re-render while the component keeps requesting passes.
    ///
    /// Returns the value of the final pass.
    ///
    /// # Panics
    ///
    /// Panics after `limit` passes without quiescence — the render-loop
    /// equivalent of an infinite loop.
    pub fn render_until_settled<R>(
        &self,
        limit: u32,
        mut component: impl FnMut(&HookCx) -> R,
    ) -> R {
        let mut result = self.render(&mut component);
        let mut passes = 1;
        while self.needs_render() {
            assert!(
                passes < limit,
                "component did not settle within {limit} render passes"
            );
            result = self.render(&mut component);
            passes += 1;
        }
        result
    }

    /// Whether a render request is outstanding.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.dirty.get()
    }

    /// Number of render passes run so far.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.renders.get()
    }

    /// The instance's hook context, for tests poking at it directly.
    #[must_use]
    pub fn cx(&self) -> &HookCx {
        &self.cx
    }
}

impl Default for ComponentHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComponentHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentHost")
            .field("renders", &self.renders.get())
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
