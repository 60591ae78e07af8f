//! Integration Tests for Order Resolution
//!
//! These tests drive the resolver end-to-end against an in-memory store.

use ordo_core::{
    ConstraintSet, Diagnostic, MemoryOrderStore, OrderStore, ResolveError, Resolver,
    ResolverConfig, UnitDeclarations,
};

/// Test the basic pinned chain: A=0, A->B +10, B->C +5.
#[test]
fn pinned_chain_resolves() {
    let constraints = ConstraintSet::new()
        .pin("A", 0)
        .depend("A", "B", 10)
        .depend("B", "C", 5);
    let store = MemoryOrderStore::new();

    let assignment = Resolver::default().resolve(&constraints, &store).unwrap();

    assert_eq!(assignment.get(&"A"), Some(0));
    assert_eq!(assignment.get(&"B"), Some(10));
    assert_eq!(assignment.get(&"C"), Some(15));
}

/// Test the negative-edge scenario: A->B -5 with A stored at 20.
///
/// A is the only root, so it keeps its stored order and B lands 5 below it.
#[test]
fn negative_edge_places_target_before_anchor() {
    let constraints = ConstraintSet::new().depend("A", "B", -5);
    let store = MemoryOrderStore::with_orders([("A", 20)]);

    let assignment = Resolver::default().resolve(&constraints, &store).unwrap();

    assert_eq!(assignment.get(&"A"), Some(20));
    assert_eq!(assignment.get(&"B"), Some(15));
}

/// Test that "B before A by 5" declared on B matches the raw edge above.
#[test]
fn before_declaration_matches_negative_edge() {
    let store = MemoryOrderStore::with_orders([("A", 20)]);

    let pass = Resolver::default().resolve_declarations(
        [
            UnitDeclarations::new("A"),
            UnitDeclarations::new("B").before("A", Some(5)),
        ],
        &store,
    );

    assert!(pass.diagnostics.is_empty());
    assert_eq!(pass.outcome.unwrap().written, vec!["B"]);
    assert_eq!(store.get(&"B"), Some(15));
}

/// Test that a two-node mutual constraint is rejected without writes.
#[test]
fn mutual_constraint_is_contradictory() {
    let constraints = ConstraintSet::new().depend("A", "B", 1).depend("B", "A", 1);
    let store = MemoryOrderStore::with_orders([("A", 3), ("B", 4)]);

    let err = Resolver::default()
        .resolve_and_apply(&constraints, &store)
        .unwrap_err();

    let ResolveError::ContradictoryConstraints { units, total } = err;
    assert_eq!(total, 2);
    assert!(units.contains(&"A") && units.contains(&"B"));

    assert_eq!(store.batches(), 0);
    assert_eq!(store.get(&"A"), Some(3));
    assert_eq!(store.get(&"B"), Some(4));
}

/// Test that a cycle in a component disjoint from a valid one still aborts
/// the whole pass.
#[test]
fn cycle_anywhere_aborts_everything() {
    let constraints = ConstraintSet::new()
        .pin("ok", 0)
        .depend("ok", "fine", 1)
        .depend("x", "y", 1)
        .depend("y", "z", 1)
        .depend("z", "x", 1);
    let store = MemoryOrderStore::new();

    let result = Resolver::default().resolve_and_apply(&constraints, &store);

    assert!(result.is_err());
    assert!(store.snapshot().is_empty());
}

/// Test that disconnected acyclic components all resolve.
#[test]
fn disconnected_components_resolve() {
    let constraints = ConstraintSet::new()
        .pin("a", 0)
        .depend("a", "b", 1)
        .pin("lonely", 42)
        .depend("m", "n", -3);
    let store = MemoryOrderStore::with_orders([("m", 7)]);

    let assignment = Resolver::default().resolve(&constraints, &store).unwrap();

    assert_eq!(assignment.len(), 5);
    assert_eq!(assignment.get(&"b"), Some(1));
    assert_eq!(assignment.get(&"lonely"), Some(42));
    assert_eq!(assignment.get(&"n"), Some(4));
}

/// Test that a pin is never overridden by incoming edges of either sign.
#[test]
fn pin_beats_incoming_edges() {
    let constraints = ConstraintSet::new()
        .pin("X", 5)
        .depend("hi", "X", 100)
        .depend("lo", "X", -100)
        .depend("X", "after_x", 1);
    let store = MemoryOrderStore::with_orders([("hi", 50), ("lo", -50)]);

    let assignment = Resolver::default().resolve(&constraints, &store).unwrap();

    assert_eq!(assignment.get(&"X"), Some(5));
    assert_eq!(assignment.get(&"after_x"), Some(6));
}

/// Test that resolving an unchanged input twice writes nothing the second time.
#[test]
fn resolution_is_idempotent() {
    let constraints = ConstraintSet::new()
        .pin("A", 0)
        .depend("A", "B", 10)
        .depend("C", "B", -2)
        .depend("B", "D", 5);
    let store = MemoryOrderStore::with_orders([("C", 30)]);
    let resolver = Resolver::default();

    let first = resolver.resolve(&constraints, &store).unwrap();
    resolver.resolve_and_apply(&constraints, &store).unwrap();
    let batches = store.batches();

    let second = resolver.resolve(&constraints, &store).unwrap();
    let report = resolver.resolve_and_apply(&constraints, &store).unwrap();

    assert_eq!(first, second);
    assert!(report.is_empty());
    assert_eq!(report.unchanged, second.len());
    assert_eq!(store.batches(), batches);
}

/// Test that changing one pin only rewrites the units whose order moved.
#[test]
fn changing_a_pin_writes_only_affected_units() {
    let resolver = Resolver::default();
    let store = MemoryOrderStore::with_orders([("D", 100)]);
    let before = ConstraintSet::new()
        .pin("A", 0)
        .depend("A", "B", 10)
        .depend("B", "C", 5)
        .depend("D", "E", 1);
    resolver.resolve_and_apply(&before, &store).unwrap();
    assert_eq!(store.get(&"E"), Some(101));

    let after = ConstraintSet::new()
        .pin("A", 20)
        .depend("A", "B", 10)
        .depend("B", "C", 5)
        .depend("D", "E", 1);
    let report = resolver.resolve_and_apply(&after, &store).unwrap();

    assert_eq!(report.written, vec!["A", "B", "C"]);
    assert_eq!(report.unchanged, 2);
    assert_eq!(store.get(&"C"), Some(35));
    assert_eq!(store.batches(), 2);
}

/// Test that an unpinned root keeps its externally stored order.
#[test]
fn unpinned_root_keeps_stored_order() {
    let constraints = ConstraintSet::new().depend("root", "leaf", 3);
    let store = MemoryOrderStore::with_orders([("root", -40), ("leaf", 0)]);

    let report = Resolver::default()
        .resolve_and_apply(&constraints, &store)
        .unwrap();

    assert_eq!(report.written, vec!["leaf"]);
    assert_eq!(store.get(&"root"), Some(-40));
    assert_eq!(store.get(&"leaf"), Some(-37));
}

/// Test that every positive edge is satisfied on a larger layered DAG.
#[test]
fn layered_dag_satisfies_every_edge() {
    let mut constraints = ConstraintSet::new().pin(0u32, 0);
    let mut edges = Vec::new();
    for layer in 0..6u32 {
        for slot in 0..5u32 {
            let node = layer * 5 + slot;
            for next in 0..5u32 {
                if (slot + next) % 2 == 0 {
                    let target = (layer + 1) * 5 + next;
                    let weight = i64::from(1 + (slot * 3 + next) % 7);
                    edges.push((node, target, weight));
                    constraints = constraints.depend(node, target, weight);
                }
            }
        }
    }
    let store = MemoryOrderStore::new();

    let assignment = Resolver::default().resolve(&constraints, &store).unwrap();

    for (from, to, weight) in edges {
        let from_order = assignment.get(&from).unwrap();
        let to_order = assignment.get(&to).unwrap();
        assert!(to_order >= from_order + weight, "{from} -> {to} (+{weight}) violated");
    }
}

/// Test the full declaration path, including every recovery diagnostic.
#[test]
fn declarations_recover_and_resolve() {
    let store = MemoryOrderStore::new();
    let resolver = Resolver::new(ResolverConfig::default().with_default_slots(100));

    let pass = resolver.resolve_declarations(
        [
            UnitDeclarations::new("Input").pin(-1000),
            UnitDeclarations::new("Physics").after("Input", None),
            UnitDeclarations::new("Render").after("Physics", Some(50)).pin(500),
            UnitDeclarations::new("Audio").after("Missing", None),
        ],
        &store,
    );

    assert_eq!(
        pass.diagnostics,
        vec![
            Diagnostic::PinOverridesRelative {
                unit: "Render",
                target: "Physics"
            },
            Diagnostic::UnresolvedTarget {
                unit: "Audio",
                target: "Missing"
            },
        ]
    );
    pass.outcome.unwrap();
    assert_eq!(store.get(&"Input"), Some(-1000));
    assert_eq!(store.get(&"Physics"), Some(-900));
    assert_eq!(store.get(&"Render"), Some(500));
    assert_eq!(store.get(&"Audio"), None);
}

/// Test resolving a JSON fixture with a JSON-configured resolver.
#[test]
fn json_fixture_resolves() {
    let config = ResolverConfig::from_json(r#"{ "fallback_order": 1000 }"#).unwrap();
    let constraints: ConstraintSet<String> = ConstraintSet::from_json(
        r#"{
            "pins": [{ "unit": "Bootstrap", "order": -500 }],
            "dependencies": [
                { "from": "Bootstrap", "to": "Loader", "delta": 10 },
                { "from": "Ui", "to": "Tooltip", "delta": -1 }
            ]
        }"#,
    )
    .unwrap();
    let store = MemoryOrderStore::new();

    Resolver::new(config)
        .resolve_and_apply(&constraints, &store)
        .unwrap();

    assert_eq!(store.current_order(&"Loader".to_string()), Some(-490));
    assert_eq!(store.current_order(&"Ui".to_string()), Some(1000));
    assert_eq!(store.current_order(&"Tooltip".to_string()), Some(999));
}

/// Test that the most negative slot count still places the unit after its anchor.
#[test]
fn minimum_slot_count_resolves_without_panicking() {
    let store = MemoryOrderStore::with_orders([("A", 0)]);

    let pass = Resolver::default().resolve_declarations(
        [
            UnitDeclarations::new("A"),
            UnitDeclarations::new("B").after("A", Some(i64::MIN)),
        ],
        &store,
    );

    assert!(matches!(
        pass.diagnostics[..],
        [Diagnostic::NegativeSlots { slots: i64::MIN, .. }]
    ));
    pass.outcome.unwrap();
    assert_eq!(store.get(&"B"), Some(i64::MAX));
}
