//! End-to-end folding tests: every entry point must preserve the
//! implemented unitary and hit the expected gate counts.

use alsvin_ir::{Circuit, QubitId};
use alsvin_zne::sim::states_equivalent;
use alsvin_zne::{
    FoldError, FoldStrategy, fold_gates, fold_gates_at_random, fold_gates_from_left,
    fold_gates_from_right, fold_global, fold_local, fold_moments,
};
use proptest::prelude::*;

const ATOL: f64 = 1e-9;

/// A small circuit mixing Clifford and rotation gates across 3 qubits.
fn mixed_circuit() -> Circuit {
    let mut circuit = Circuit::with_size("mixed", 3, 0);
    circuit
        .h(QubitId(0))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .t(QubitId(2))
        .unwrap()
        .rz(0.3, QubitId(1))
        .unwrap()
        .cx(QubitId(1), QubitId(2))
        .unwrap()
        .rx(1.1, QubitId(0))
        .unwrap()
        .s(QubitId(2))
        .unwrap();
    circuit
}

fn expected_gate_count(num_gates: usize, stretch: f64) -> usize {
    let k = (num_gates as f64 * (stretch - 1.0) / 2.0).round();
    num_gates + 2 * if k <= 0.0 { 0 } else { k as usize }
}

#[test]
fn stretch_one_is_identity_for_every_entry_point() {
    let circuit = mixed_circuit();
    assert_eq!(fold_gates_from_left(&circuit, 1.0).unwrap(), circuit);
    assert_eq!(fold_gates_from_right(&circuit, 1.0).unwrap(), circuit);
    assert_eq!(fold_gates_at_random(&circuit, 1.0, Some(2)).unwrap(), circuit);
    assert_eq!(
        fold_local(&circuit, 1.0, &FoldStrategy::FromLeft).unwrap(),
        circuit
    );
    assert_eq!(
        fold_global(&circuit, 1.0, &FoldStrategy::FromLeft).unwrap(),
        circuit
    );
}

#[test]
fn local_folds_preserve_the_unitary() {
    let circuit = mixed_circuit();
    for stretch in [1.3, 2.0, 2.7, 3.0] {
        let left = fold_gates_from_left(&circuit, stretch).unwrap();
        let right = fold_gates_from_right(&circuit, stretch).unwrap();
        let random = fold_gates_at_random(&circuit, stretch, Some(13)).unwrap();

        assert!(states_equivalent(&circuit, &left, ATOL).unwrap());
        assert!(states_equivalent(&circuit, &right, ATOL).unwrap());
        assert!(states_equivalent(&circuit, &random, ATOL).unwrap());
    }
}

#[test]
fn composed_and_global_folds_preserve_the_unitary() {
    let circuit = mixed_circuit();
    for stretch in [2.0, 3.0, 4.0, 5.5, 9.0] {
        let local = fold_local(&circuit, stretch, &FoldStrategy::FromLeft).unwrap();
        let global = fold_global(&circuit, stretch, &FoldStrategy::FromRight).unwrap();

        assert!(states_equivalent(&circuit, &local, ATOL).unwrap());
        assert!(states_equivalent(&circuit, &global, ATOL).unwrap());
    }
}

#[test]
fn moment_folds_preserve_the_unitary() {
    let circuit = mixed_circuit();
    let folded = fold_moments(&circuit, &[0, 1]).unwrap();
    assert!(states_equivalent(&circuit, &folded, ATOL).unwrap());
}

#[test]
fn explicit_folds_preserve_the_unitary() {
    let circuit = mixed_circuit();
    let folded = fold_gates(&circuit, &[0, 1], &[vec![0, 1], vec![0]]).unwrap();
    assert!(states_equivalent(&circuit, &folded, ATOL).unwrap());
}

#[test]
fn gate_counts_follow_the_budget_formula() {
    let circuit = mixed_circuit(); // 7 gates
    for stretch in [1.0, 1.2, 1.5, 2.0, 2.4, 3.0] {
        let expected = expected_gate_count(7, stretch);
        assert_eq!(
            fold_gates_from_left(&circuit, stretch).unwrap().num_gates(),
            expected,
            "left, stretch {stretch}"
        );
        assert_eq!(
            fold_gates_from_right(&circuit, stretch).unwrap().num_gates(),
            expected,
            "right, stretch {stretch}"
        );
        assert_eq!(
            fold_gates_at_random(&circuit, stretch, Some(0))
                .unwrap()
                .num_gates(),
            expected,
            "random, stretch {stretch}"
        );
    }
}

#[test]
fn seeded_random_folding_is_deterministic() {
    let circuit = mixed_circuit();
    for seed in [0, 1, 42, u64::MAX] {
        let a = fold_gates_at_random(&circuit, 2.2, Some(seed)).unwrap();
        let b = fold_gates_at_random(&circuit, 2.2, Some(seed)).unwrap();
        assert_eq!(a, b, "seed {seed}");
    }
}

#[test]
fn measurements_stay_terminal_through_every_fold() {
    let mut circuit = mixed_circuit();
    circuit.measure_all().unwrap();
    let num_measurements = circuit.num_ops() - circuit.num_gates();

    let folds = [
        fold_gates_from_left(&circuit, 2.5).unwrap(),
        fold_gates_from_right(&circuit, 2.5).unwrap(),
        fold_gates_at_random(&circuit, 2.5, Some(9)).unwrap(),
        fold_local(&circuit, 6.0, &FoldStrategy::FromLeft).unwrap(),
        fold_global(&circuit, 6.0, &FoldStrategy::FromLeft).unwrap(),
    ];
    for folded in folds {
        assert!(folded.all_measurements_terminal());
        assert_eq!(folded.num_ops() - folded.num_gates(), num_measurements);
        let last = folded.moment(folded.num_moments() - 1).unwrap();
        assert!(last.iter().all(|inst| inst.is_measure()));
    }
}

#[test]
fn global_fold_appends_whole_copies() {
    let circuit = mixed_circuit(); // 7 gates
    // stretch 3: C C⁻¹ C
    let folded = fold_global(&circuit, 3.0, &FoldStrategy::FromLeft).unwrap();
    assert_eq!(folded.num_gates(), 21);
    // stretch 4: remainder 1 adds nothing
    let folded = fold_global(&circuit, 4.0, &FoldStrategy::FromLeft).unwrap();
    assert_eq!(folded.num_gates(), 21);
    // stretch 5: remainder 2 adds round(7 · 1 / 2) = 4 local folds
    let folded = fold_global(&circuit, 5.0, &FoldStrategy::FromLeft).unwrap();
    assert_eq!(folded.num_gates(), 29);
}

#[test]
fn staged_local_folding_reaches_large_stretches() {
    let circuit = mixed_circuit(); // 7 gates
    // Stage 1 folds everything (21 gates), stage 2 runs at 9/3 = 3 and
    // folds everything again.
    let folded = fold_local(&circuit, 9.0, &FoldStrategy::FromLeft).unwrap();
    assert_eq!(folded.num_gates(), 63);
}

#[test]
fn intermediate_measurements_are_rejected_everywhere() {
    let mut circuit = Circuit::with_size("mid", 2, 1);
    circuit.h(QubitId(0)).unwrap();
    circuit.measure(QubitId(0), alsvin_ir::ClbitId(0)).unwrap();
    circuit.x(QubitId(0)).unwrap();

    assert!(matches!(
        fold_gates_from_left(&circuit, 2.0),
        Err(FoldError::IntermediateMeasurement)
    ));
    assert!(matches!(
        fold_gates_from_right(&circuit, 2.0),
        Err(FoldError::IntermediateMeasurement)
    ));
    assert!(matches!(
        fold_gates_at_random(&circuit, 2.0, Some(1)),
        Err(FoldError::IntermediateMeasurement)
    ));
    assert!(matches!(
        fold_global(&circuit, 3.0, &FoldStrategy::FromLeft),
        Err(FoldError::IntermediateMeasurement)
    ));
}

#[test]
fn stretch_bounds_are_enforced() {
    let circuit = mixed_circuit();
    assert!(matches!(
        fold_gates_from_left(&circuit, 3.2),
        Err(FoldError::StretchOutOfBounds(_))
    ));
    assert!(matches!(
        fold_gates_at_random(&circuit, 0.8, Some(0)),
        Err(FoldError::StretchOutOfBounds(_))
    ));
    assert!(matches!(
        fold_local(&circuit, 0.5, &FoldStrategy::FromLeft),
        Err(FoldError::StretchBelowOne(_))
    ));
    assert!(matches!(
        fold_global(&circuit, 0.5, &FoldStrategy::FromLeft),
        Err(FoldError::StretchBelowOne(_))
    ));
}

#[test]
fn empty_circuit_folds_to_empty() {
    let circuit = Circuit::with_size("empty", 2, 0);
    let folded = fold_gates_from_left(&circuit, 3.0).unwrap();
    assert_eq!(folded.num_gates(), 0);
    let folded = fold_global(&circuit, 5.0, &FoldStrategy::FromLeft).unwrap();
    assert_eq!(folded.num_gates(), 0);
}

proptest! {
    #[test]
    fn prop_left_fold_gate_count(width in 2u32..7, stretch in 1.0f64..3.0) {
        let circuit = Circuit::ghz(width).unwrap();
        let folded = fold_gates_from_left(&circuit, stretch).unwrap();
        prop_assert_eq!(
            folded.num_gates(),
            expected_gate_count(width as usize, stretch)
        );
    }

    #[test]
    fn prop_random_fold_preserves_unitary(
        width in 2u32..5,
        stretch in 1.0f64..3.0,
        seed in any::<u64>(),
    ) {
        let circuit = Circuit::ghz(width).unwrap();
        let folded = fold_gates_at_random(&circuit, stretch, Some(seed)).unwrap();
        prop_assert!(states_equivalent(&circuit, &folded, ATOL).unwrap());
    }

    #[test]
    fn prop_composed_folds_never_shrink(stretch in 1.0f64..12.0) {
        let circuit = Circuit::ghz(4).unwrap();
        let folded = fold_local(&circuit, stretch, &FoldStrategy::FromLeft).unwrap();
        prop_assert!(folded.num_gates() >= circuit.num_gates());
    }
}
