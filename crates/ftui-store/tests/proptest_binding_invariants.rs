//! Property-based invariant tests for stable binding and store dispatch.
//!
//! These hold for **any** sequence of renders and dispatches:
//!
//! 1. Bound identity is stable across arbitrarily many rebinds.
//! 2. A bound call always runs the most recently supplied closure.
//! 3. Store state equals the fold of all successful dispatches, regardless
//!    of how render passes interleave with them.
//! 4. Failed dispatches never perturb the fold.

use ftui_store::prelude::*;
use ftui_store::MethodBinder;
use ftui_store_harness::ComponentHost;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// One step of a store workload: dispatch an amount, fail on purpose, or
/// run a render pass.
#[derive(Clone, Debug)]
enum Step {
    Add(i64),
    Fail,
    Render,
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    proptest::collection::vec(
        prop_oneof![
            (-1000i64..1000).prop_map(Step::Add),
            Just(Step::Fail),
            Just(Step::Render),
        ],
        0..60,
    )
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Tally {
    total: i64,
}

fn tally_store() -> StoreDescriptor<Tally, i64> {
    define_state(Tally { total: 0 }).define_reducers(
        ReducerMap::new()
            .with(
                "add",
                reducer(|draft: &mut Tally, amount: i64| {
                    draft.total += amount;
                    Ok(Produced::Mutated)
                }),
            )
            .with(
                "fail",
                reducer(|_draft: &mut Tally, _amount: i64| Err("always fails".into())),
            ),
    )
}

// ── Binder invariants ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn rebinds_preserve_identity_and_deliver_latest(values in proptest::collection::vec(any::<i64>(), 1..40)) {
        let mut binder = MethodBinder::new(
            MethodMap::new().with("get", method(|(): ()| 0i64)),
        );
        let bound = binder.bound();

        for v in values {
            let rebound = binder
                .rebind(MethodMap::new().with("get", method(move |(): ()| v)))
                .unwrap();
            prop_assert!(Bound::ptr_eq(&bound, &rebound));
            prop_assert_eq!(bound.call("get", ()).unwrap(), v);
        }
    }

    #[test]
    fn payloads_round_trip_through_the_trampoline(pairs in proptest::collection::vec((any::<i32>(), any::<i32>()), 0..40)) {
        let binder = MethodBinder::new(
            MethodMap::new().with("echo", method(|pair: (i32, i32)| pair)),
        );
        let bound = binder.bound();
        for pair in pairs {
            prop_assert_eq!(bound.call("echo", pair).unwrap(), pair);
        }
    }
}

// ── Store invariants ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn state_is_the_fold_of_successful_dispatches(workload in steps()) {
        let host = ComponentHost::new();
        let (_, actions) = host.render(|cx| use_store(cx, tally_store()).unwrap());

        let mut expected = 0i64;
        for step in workload {
            match step {
                Step::Add(amount) => {
                    actions.dispatch("add", amount).unwrap();
                    expected += amount;
                }
                Step::Fail => {
                    prop_assert!(actions.dispatch("fail", 0).is_err());
                }
                Step::Render => {
                    let (state, fresh) =
                        host.render(|cx| use_store(cx, tally_store()).unwrap());
                    prop_assert_eq!(state.total, expected);
                    prop_assert!(Actions::ptr_eq(&actions, &fresh));
                }
            }
        }

        // Final settle: whatever was still pending is visible now.
        let (state, _) = host.render(|cx| use_store(cx, tally_store()).unwrap());
        prop_assert_eq!(state.total, expected);
    }
}
