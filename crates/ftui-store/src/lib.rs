#![forbid(unsafe_code)]

//! State binding utilities for component-based reactive UI runtimes.
//!
//! Two small pieces, one shared pattern:
//!
//! - [`binder`]: a stable method binder. Re-renders supply fresh closures
//!   every time, yet the handles handed back never change identity —
//!   behavior is swapped inside per-name indirection cells.
//! - [`store`]: a minimal state container whose mutations are draft-editing
//!   reducers applied through a pluggable [`produce::DraftEngine`],
//!   returning the current snapshot plus an identity-stable set of dispatch
//!   actions.
//!
//! The host runtime is reached through two narrow seams in [`host`]: a
//! persisted-cell context ([`host::HookCx`]) threaded into every render of a
//! component instance, and a reactive state slot ([`host::StateSlot`])
//! whose updates commit on the next render pass. This crate implements
//! neither a render scheduler nor a structural-sharing engine; it only
//! consumes those contracts.
//!
//! # Example
//!
//! ```
//! use ftui_store::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter { count: i64 }
//!
//! // The host owns one HookCx per component instance.
//! let cx = HookCx::new(|| { /* schedule a re-render */ });
//!
//! let descriptor = || define_state(Counter { count: 0 }).define_reducers(
//!     ReducerMap::new().with("inc", reducer(|draft: &mut Counter, (): ()| {
//!         draft.count += 1;
//!         Ok(Produced::Mutated)
//!     })),
//! );
//!
//! cx.begin_render();
//! let (state, actions) = use_store(&cx, descriptor()).unwrap();
//! assert_eq!(state.count, 0);
//!
//! actions.dispatch("inc", ()).unwrap();
//!
//! // The commit becomes visible on the next render pass.
//! cx.begin_render();
//! let (state, _) = use_store(&cx, descriptor()).unwrap();
//! assert_eq!(state.count, 1);
//! ```

pub mod binder;
pub mod error;
pub mod host;
pub mod produce;
pub mod registry;
pub mod store;

pub use binder::{Action, Bound, MethodBinder, MethodFn, MethodMap, method, use_methods};
pub use error::{BindError, ReducerError, StoreError};
pub use host::{HookCx, StateSlot};
pub use produce::{CloneOnWrite, DraftEngine, Produced};
pub use registry::NamedRegistry;
pub use store::{
    Actions, Reducer, ReducerMap, StateBuilder, StoreDescriptor, define_state, define_store,
    reducer, use_store, use_store_with,
};

/// Common imports for components using stores and bound methods.
pub mod prelude {
    pub use crate::binder::{Bound, MethodMap, method, use_methods};
    pub use crate::error::{BindError, ReducerError, StoreError};
    pub use crate::host::{HookCx, StateSlot};
    pub use crate::produce::{CloneOnWrite, DraftEngine, Produced};
    pub use crate::store::{
        Actions, ReducerMap, StoreDescriptor, define_state, define_store, reducer, use_store,
        use_store_with,
    };
}
