//! End-to-end render-loop tests: stores and bound methods driven through
//! the simulated host, the way a real component would use them.

use ftui_store::prelude::*;
use ftui_store_harness::ComponentHost;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Counter {
    count: i64,
}

/// Counter store with the three reducer shapes the crate supports:
/// draft mutation, pure replacement, and failure.
fn counter_store() -> StoreDescriptor<Counter, Vec<i64>> {
    define_state(Counter { count: 0 }).define_reducers(
        ReducerMap::new()
            .with(
                "inc",
                reducer(|draft: &mut Counter, _args: Vec<i64>| {
                    draft.count += 1;
                    Ok(Produced::Mutated)
                }),
            )
            .with(
                "add",
                reducer(|draft: &mut Counter, args: Vec<i64>| {
                    draft.count += args.iter().sum::<i64>();
                    Ok(Produced::Mutated)
                }),
            )
            .with(
                "reset",
                reducer(|_draft: &mut Counter, args: Vec<i64>| {
                    Ok(Produced::Replaced(Counter { count: args[0] }))
                }),
            )
            .with(
                "bad",
                reducer(|draft: &mut Counter, _args: Vec<i64>| {
                    draft.count = -1;
                    Err("bad reducer".into())
                }),
            ),
    )
}

fn render_store(host: &ComponentHost) -> (Counter, Actions<Vec<i64>>) {
    host.render(|cx| use_store(cx, counter_store()).expect("store render"))
}

#[test]
fn sequential_increments_observe_each_prior_render() {
    let host = ComponentHost::new();

    let (state, actions) = render_store(&host);
    assert_eq!(state.count, 0);

    actions.dispatch("inc", vec![]).unwrap();
    let (state, _) = render_store(&host);
    assert_eq!(state.count, 1);

    actions.dispatch("inc", vec![]).unwrap();
    let (state, _) = render_store(&host);
    assert_eq!(state.count, 2);
}

#[test]
fn actions_identity_stable_for_instance_lifetime() {
    let host = ComponentHost::new();
    let (_, first) = render_store(&host);

    for _ in 0..20 {
        let (_, actions) = render_store(&host);
        assert!(Actions::ptr_eq(&first, &actions));
    }
}

#[test]
fn batched_dispatches_render_once() {
    let host = ComponentHost::new();
    let (_, actions) = render_store(&host);

    // Three dispatches in one turn: one outstanding request, one extra
    // pass, all three commits visible.
    actions.dispatch("inc", vec![]).unwrap();
    actions.dispatch("add", vec![2, 3]).unwrap();
    actions.dispatch("inc", vec![]).unwrap();
    assert!(host.needs_render());

    let before = host.render_count();
    let (state, _) = host.render_until_settled(4, |cx| {
        use_store(cx, counter_store()).expect("store render")
    });
    assert_eq!(state.count, 7);
    assert_eq!(host.render_count() - before, 1);
}

#[test]
fn pure_replacement_reducer_commits_returned_value() {
    let host = ComponentHost::new();
    let (_, actions) = render_store(&host);

    actions.dispatch("add", vec![40]).unwrap();
    actions.dispatch("reset", vec![5]).unwrap();

    let (state, _) = render_store(&host);
    assert_eq!(state, Counter { count: 5 });
}

#[test]
fn failed_dispatch_keeps_prior_snapshot_exactly() {
    let host = ComponentHost::new();
    let (_, actions) = render_store(&host);

    actions.dispatch("add", vec![10]).unwrap();
    let (before, actions) = render_store(&host);

    let err = actions.dispatch("bad", vec![]).unwrap_err();
    assert!(matches!(err, StoreError::Reducer(_)));
    assert!(!host.needs_render(), "failure must not request a render");

    let (after, _) = render_store(&host);
    assert_eq!(after, before);
}

#[test]
fn failure_then_success_resumes_from_unchanged_state() {
    let host = ComponentHost::new();
    let (_, actions) = render_store(&host);

    actions.dispatch("inc", vec![]).unwrap();
    actions.dispatch("bad", vec![]).unwrap_err();
    actions.dispatch("inc", vec![]).unwrap();

    let (state, _) = render_store(&host);
    assert_eq!(state.count, 2);
}

#[test]
fn unknown_action_is_an_error_not_a_noop() {
    let host = ComponentHost::new();
    let (_, actions) = render_store(&host);

    let err = actions.dispatch("nonexistent", vec![]).unwrap_err();
    assert!(matches!(err, StoreError::UnknownAction { name } if name == "nonexistent"));
}

#[test]
fn dispatch_after_later_renders_uses_latest_state() {
    let host = ComponentHost::new();
    let (_, actions) = render_store(&host);

    actions.dispatch("add", vec![100]).unwrap();
    let _ = render_store(&host);
    let _ = render_store(&host);

    // Handle captured on render 1 still dispatches against current state.
    actions.dispatch("inc", vec![]).unwrap();
    let (state, _) = render_store(&host);
    assert_eq!(state.count, 101);
}

#[test]
fn two_hosts_are_independent_instances() {
    let host_a = ComponentHost::new();
    let host_b = ComponentHost::new();

    let (_, actions_a) = render_store(&host_a);
    let (_, actions_b) = render_store(&host_b);
    assert!(!Actions::ptr_eq(&actions_a, &actions_b));

    actions_a.dispatch("add", vec![5]).unwrap();

    let (state_a, _) = render_store(&host_a);
    let (state_b, _) = render_store(&host_b);
    assert_eq!(state_a.count, 5);
    assert_eq!(state_b.count, 0, "stores must not share state");
}

#[test]
fn store_and_bound_methods_coexist_in_one_component() {
    let host = ComponentHost::new();

    // A component using both hooks; cell order must hold across renders.
    let run = |label: &'static str| {
        host.render(move |cx| {
            let (state, actions) = use_store(cx, counter_store()).expect("store render");
            let bound = use_methods(
                cx,
                MethodMap::new().with("label", method(move |(): ()| label)),
            )
            .expect("bind");
            (state, actions, bound)
        })
    };

    let (state, actions, bound) = run("first");
    assert_eq!(state.count, 0);
    assert_eq!(bound.call("label", ()).unwrap(), "first");

    actions.dispatch("inc", vec![]).unwrap();

    let (state, actions_2, bound_2) = run("second");
    assert_eq!(state.count, 1);
    assert!(Actions::ptr_eq(&actions, &actions_2));
    assert!(Bound::ptr_eq(&bound, &bound_2));
    assert_eq!(bound.call("label", ()).unwrap(), "second");
}
