//! The preparation pipeline must preserve the unitary, global phase included.

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;

use tnequiv_adapter_sim::circuit_unitary;
use tnequiv_compile::PassManagerBuilder;
use tnequiv_compile::passes::{ConditionalEliminationReport, DecompositionStats};
use tnequiv_ir::{
    Circuit, CircuitBox, ClassicalCondition, ClbitId, DiagonalBox, QubitId, StandardGate,
};

fn prepare(circuit: &mut Circuit) -> tnequiv_compile::PropertySet {
    let (pm, mut props) = PassManagerBuilder::contraction_preparation().build();
    pm.run(circuit, &mut props).unwrap();
    props
}

fn assert_same_unitary(a: &Array2<Complex64>, b: &Array2<Complex64>) {
    assert_eq!(a.dim(), b.dim());
    for ((row, col), x) in a.indexed_iter() {
        let y = b[[row, col]];
        assert!((x - y).norm() < 1e-9, "entry [{row},{col}]: {x} != {y}");
    }
}

fn bit(x: usize, i: u32) -> usize {
    (x >> i) & 1
}

#[test]
fn test_box_inlining_keeps_inner_phase() {
    let mut inner = Circuit::with_size("b", 2, 0);
    inner
        .h(QubitId(0))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .rz(0.7, QubitId(1))
        .unwrap();
    inner.set_global_phase(0.4);

    let mut boxed = Circuit::with_size("boxed", 3, 0);
    boxed
        .x(QubitId(2))
        .unwrap()
        .add_box(
            CircuitBox::new(&inner).unwrap().with_label("B"),
            [QubitId(2), QubitId(0)],
        )
        .unwrap();
    let expected = circuit_unitary(&{
        let mut flat = Circuit::with_size("flat", 3, 0);
        flat.x(QubitId(2))
            .unwrap()
            .h(QubitId(2))
            .unwrap()
            .cx(QubitId(2), QubitId(0))
            .unwrap()
            .rz(0.7, QubitId(0))
            .unwrap();
        flat.set_global_phase(0.4);
        flat
    })
    .unwrap();

    let props = prepare(&mut boxed);
    assert_eq!(props.get::<DecompositionStats>().unwrap().boxes_inlined, 1);
    assert_same_unitary(&circuit_unitary(&boxed).unwrap(), &expected);
}

#[test]
fn test_nested_boxes_and_dagger() {
    let mut leaf = Circuit::with_size("leaf", 1, 0);
    leaf.t(QubitId(0)).unwrap().sx(QubitId(0)).unwrap();
    let mut middle = Circuit::with_size("middle", 2, 0);
    middle
        .add_box(CircuitBox::new(&leaf).unwrap(), [QubitId(1)])
        .unwrap()
        .cz(QubitId(0), QubitId(1))
        .unwrap();

    let mut circuit = Circuit::with_size("outer", 2, 0);
    circuit
        .add_box(CircuitBox::new(&middle).unwrap(), [QubitId(0), QubitId(1)])
        .unwrap();
    let mut daggered = circuit.dagger().unwrap();

    let props = prepare(&mut circuit);
    assert_eq!(props.get::<DecompositionStats>().unwrap().boxes_inlined, 2);
    prepare(&mut daggered);

    let u = circuit_unitary(&circuit).unwrap();
    let v = circuit_unitary(&daggered).unwrap();
    let identity = Array2::from_diag(&ndarray::Array1::from_elem(4, Complex64::new(1.0, 0.0)));
    assert_same_unitary(&v.dot(&u), &identity);
}

#[test]
fn test_diagonal_on_permuted_operands() {
    let phases = [0.1, -0.8, 2.3, 1.25];
    let operands = [QubitId(2), QubitId(0)];
    let mut circuit = Circuit::with_size("diag", 3, 0);
    circuit
        .add_diagonal(DiagonalBox::from_phases(phases).unwrap(), operands)
        .unwrap();

    let props = prepare(&mut circuit);
    assert_eq!(props.get::<DecompositionStats>().unwrap().diagonals_synthesized, 1);
    assert!(circuit.instructions().all(|i| !i.is_box()));

    let u = circuit_unitary(&circuit).unwrap();
    for x in 0..8 {
        let local = bit(x, 2) | (bit(x, 0) << 1);
        let expected = Complex64::from_polar(1.0, phases[local]);
        assert!((u[[x, x]] - expected).norm() < 1e-9, "diagonal entry {x}");
    }
}

#[test]
fn test_deferred_measurement_matches_cx() {
    let mut circuit = Circuit::with_size("teleport-ish", 2, 1);
    circuit
        .h(QubitId(0))
        .unwrap()
        .measure(QubitId(0), ClbitId(0))
        .unwrap()
        .conditional_gate(
            StandardGate::X,
            [QubitId(1)],
            ClassicalCondition::bit(ClbitId(0)),
        )
        .unwrap();

    let (pm, mut props) = PassManagerBuilder::contraction_preparation()
        .with_conditional_elimination(true)
        .build();
    pm.run(&mut circuit, &mut props).unwrap();

    let report = props.get::<ConditionalEliminationReport>().unwrap();
    assert_eq!(report.conditionals_rewritten, 1);
    assert_eq!(circuit.num_clbits(), 0);

    let mut expected = Circuit::with_size("bell", 2, 0);
    expected.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
    assert_same_unitary(
        &circuit_unitary(&circuit).unwrap(),
        &circuit_unitary(&expected).unwrap(),
    );
}

proptest! {
    #[test]
    fn prop_diagonal_synthesis_is_exact(
        phases in proptest::collection::vec(-std::f64::consts::PI..std::f64::consts::PI, 8)
    ) {
        let mut circuit = Circuit::with_size("diag", 3, 0);
        circuit
            .add_diagonal(
                DiagonalBox::from_phases(phases.clone()).unwrap(),
                [QubitId(0), QubitId(1), QubitId(2)],
            )
            .unwrap();
        prepare(&mut circuit);

        let u = circuit_unitary(&circuit).unwrap();
        for (x, &theta) in phases.iter().enumerate() {
            let expected = Complex64::from_polar(1.0, theta);
            prop_assert!((u[[x, x]] - expected).norm() < 1e-9);
        }
    }
}
