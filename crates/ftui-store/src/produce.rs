#![forbid(unsafe_code)]

//! Draft-mutation producer seam.
//!
//! Reducers edit a *draft* of the current state. The engine that turns a
//! base state plus a reducer run into the next committed value lives behind
//! [`DraftEngine`], so a host can plug in a real structural-sharing
//! implementation without this crate knowing about it.
//!
//! A reducer signals its outcome explicitly with [`Produced`]: either it
//! mutated the draft in place, or it returned a wholly new value. There is
//! no implicit "returned nothing means mutation" convention.
//!
//! # Engine contract
//!
//! 1. `base` is never mutated, under any outcome.
//! 2. On failure nothing is committed; the caller observes only the error.
//! 3. The reducer closure is run at most once per `apply` call.
//!
//! [`CloneOnWrite`] is the baseline engine: it clones the base into a draft
//! and discards the draft on failure. It satisfies the contract without any
//! structural sharing.

use crate::error::ReducerError;

/// Outcome of one reducer run against a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Produced<S> {
    /// The reducer mutated the draft in place; the draft is the next state.
    Mutated,
    /// The reducer ignored the draft and returned a wholly new value.
    Replaced(S),
}

/// Boundary to the structural-sharing update engine.
///
/// `apply` runs `run` against a writable draft of `base` and yields the
/// next state. Implementations decide how the draft is materialized; the
/// guarantees in the module docs are what the store relies on.
pub trait DraftEngine<S> {
    /// Compute the next state from `base` via one reducer run.
    fn apply(
        &self,
        base: &S,
        run: &mut dyn FnMut(&mut S) -> Result<Produced<S>, ReducerError>,
    ) -> Result<S, ReducerError>;
}

/// Baseline engine: clone the base, run the reducer on the clone.
///
/// No partial commit is possible because the base is never touched; a
/// failed run simply drops the draft.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloneOnWrite;

impl<S: Clone> DraftEngine<S> for CloneOnWrite {
    fn apply(
        &self,
        base: &S,
        run: &mut dyn FnMut(&mut S) -> Result<Produced<S>, ReducerError>,
    ) -> Result<S, ReducerError> {
        let mut draft = base.clone();
        match run(&mut draft)? {
            Produced::Mutated => Ok(draft),
            Produced::Replaced(next) => Ok(next),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
