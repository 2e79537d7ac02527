#![forbid(unsafe_code)]

//! Host-runtime capability seams.
//!
//! A component runtime that wants to drive stores supplies two things per
//! component instance, both modeled here:
//!
//! - [`HookCx`]: the persisted-cell capability. One `HookCx` is threaded by
//!   the host into every render of one component instance; cells acquired
//!   through it are the same storage on every render and run their
//!   initializer only once.
//! - [`StateSlot`]: the reactive-state capability. A slot's committed value
//!   is what the current render pass observes; updates queue and become
//!   visible only when the next pass begins.
//!
//! # Invariants
//!
//! 1. Cell acquisition order is fixed: a render must acquire the same cells
//!    in the same order as the first render (call-order slot addressing).
//! 2. `request_update` never changes the committed value synchronously.
//! 3. Updates queued before the next pass coalesce, last write wins.
//! 4. Every `request_update` signals the host's render scheduler.

pub mod hook_cx;
pub mod state_slot;

pub use hook_cx::HookCx;
pub use state_slot::StateSlot;
