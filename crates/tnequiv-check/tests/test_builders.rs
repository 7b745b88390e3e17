//! State-level checks of the Bell and Choi builders against the statevector
//! engine.

mod common;

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;

use tnequiv_adapter_sim::{circuit_unitary, simulate};
use tnequiv_check::{
    Orientation, build_ancilla_check_circuit, build_bell_pairs, embed_boxed_choi_state,
    embed_choi_state, embed_diagonal_choi_state,
};
use tnequiv_compile::PassManagerBuilder;
use tnequiv_ir::{Circuit, DiagonalBox, QubitId, StandardGate};

const EPS: f64 = 1e-10;

fn bit(x: usize, i: usize) -> usize {
    (x >> i) & 1
}

/// Choi statevector reshaped row-major: row = target index, column = control
/// index, scaled back up by `sqrt(2^n)`.
fn choi_matrix(choi: &Circuit, n: usize) -> Array2<Complex64> {
    let amplitudes = simulate(choi).unwrap().into_amplitudes();
    let dim = 1usize << n;
    let scale = (dim as f64).sqrt();
    Array2::from_shape_vec((dim, dim), amplitudes)
        .unwrap()
        .mapv(|z| z * scale)
}

fn assert_matrix_eq(actual: &Array2<Complex64>, expected: &Array2<Complex64>) {
    assert_eq!(actual.dim(), expected.dim());
    for ((row, col), value) in actual.indexed_iter() {
        let want = expected[[row, col]];
        assert!(
            (value - want).norm() < EPS,
            "[{row},{col}]: got {value}, want {want}"
        );
    }
}

#[test]
fn test_bell_pairs_prepare_product_of_bell_states() {
    common::init_tracing();
    for n in 0..=3usize {
        let pairs = build_bell_pairs(n, "C", "T").unwrap();
        let state = simulate(&pairs.circuit).unwrap();
        let amp = 1.0 / ((1usize << n) as f64).sqrt();

        for (x, value) in state.amplitudes().iter().enumerate() {
            let paired = (0..n).all(|i| bit(x, i) == bit(x, n + i));
            let expected = if paired { amp } else { 0.0 };
            assert!(
                (value - Complex64::new(expected, 0.0)).norm() < EPS,
                "n = {n}, index {x}: {value}"
            );
        }
    }
}

#[test]
fn test_choi_of_y_is_y() {
    let mut y = Circuit::with_size("y", 1, 0);
    y.y(QubitId(0)).unwrap();

    let choi = embed_choi_state(&y).unwrap();
    let expected = Array2::from_shape_vec(
        (2, 2),
        vec![
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, 0.0),
        ],
    )
    .unwrap();
    assert_matrix_eq(&choi_matrix(&choi, 1), &expected);
}

#[test]
fn test_choi_of_h_is_h() {
    let mut h = Circuit::with_size("h", 1, 0);
    h.h(QubitId(0)).unwrap();

    let choi = embed_choi_state(&h).unwrap();
    let s = std::f64::consts::FRAC_1_SQRT_2;
    let expected = Array2::from_shape_vec(
        (2, 2),
        vec![
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(-s, 0.0),
        ],
    )
    .unwrap();
    assert_matrix_eq(&choi_matrix(&choi, 1), &expected);
}

#[test]
fn test_choi_of_entangling_rotation_matches_unitary() {
    let mut u = Circuit::with_size("rz_cx", 2, 0);
    u.h(QubitId(0))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap()
        .rz(0.7, QubitId(1))
        .unwrap()
        .cx(QubitId(0), QubitId(1))
        .unwrap();

    let choi = embed_choi_state(&u).unwrap();
    assert_matrix_eq(&choi_matrix(&choi, 2), &circuit_unitary(&u).unwrap());
}

#[test]
fn test_choi_keeps_global_phase_in_amplitudes() {
    let mut u = Circuit::with_size("phased", 1, 0);
    u.x(QubitId(0)).unwrap();
    u.set_global_phase(0.25);

    let choi = embed_choi_state(&u).unwrap();
    assert_matrix_eq(&choi_matrix(&choi, 1), &circuit_unitary(&u).unwrap());
}

#[test]
fn test_boxed_choi_matches_plain_after_decomposition() {
    let u = Circuit::qft(2).unwrap();
    let mut boxed = embed_boxed_choi_state(&u, "QFT").unwrap();
    let (pm, mut props) = PassManagerBuilder::contraction_preparation().build();
    pm.run(&mut boxed, &mut props).unwrap();

    let plain = simulate(&embed_choi_state(&u).unwrap()).unwrap();
    let boxed = simulate(&boxed).unwrap();
    assert!((plain.inner(&boxed) - Complex64::new(1.0, 0.0)).norm() < EPS);
}

#[test]
fn test_diagonal_choi_amplitudes() {
    let phases = [0.0, 0.3, -1.2, 2.0, 0.9, -0.4, 1.7, 3.0];
    let diagonal = DiagonalBox::from_phases(phases).unwrap();
    let choi = embed_diagonal_choi_state(&diagonal).unwrap();
    let state = simulate(&choi).unwrap();

    let amp = 1.0 / 8f64.sqrt();
    for (x, value) in state.amplitudes().iter().enumerate() {
        let expected = Complex64::from_polar(amp, phases[x]);
        assert!(
            (value - expected).norm() < EPS,
            "index {x}: got {value}, want {expected}"
        );
    }
}

#[test]
fn test_ancilla_sides_are_normalized_states() {
    let mut a = Circuit::with_size("a", 1, 0);
    a.gate(StandardGate::S, [QubitId(0)]).unwrap();
    let mut b = Circuit::with_size("b", 2, 0);
    b.gate(StandardGate::S, [QubitId(0)]).unwrap();

    for orientation in [Orientation::Lhs, Orientation::Rhs] {
        let mut circuit = build_ancilla_check_circuit(&a, &b, orientation).unwrap();
        let (pm, mut props) = PassManagerBuilder::contraction_preparation().build();
        pm.run(&mut circuit, &mut props).unwrap();
        let norm = simulate(&circuit).unwrap().norm_sqr();
        assert!((norm - 1.0).abs() < EPS, "{orientation}: norm {norm}");
    }
}

proptest! {
    #[test]
    fn prop_bell_pairs_structure(n in 0usize..12) {
        let pairs = build_bell_pairs(n, "ctl", "tgt").unwrap();
        prop_assert_eq!(pairs.circuit.num_qubits(), 2 * n);
        prop_assert_eq!(pairs.circuit.num_ops(), 2 * n);
        prop_assert_eq!(pairs.control.len(), n);
        prop_assert_eq!(pairs.target.len(), n);

        let ops: Vec<_> = pairs.circuit.instructions().collect();
        for (i, inst) in ops.iter().take(n).enumerate() {
            prop_assert_eq!(inst.name(), "h");
            prop_assert_eq!(&inst.qubits, &vec![pairs.control.qubits()[i]]);
        }
        for (i, inst) in ops.iter().skip(n).enumerate() {
            prop_assert_eq!(inst.name(), "cx");
            prop_assert_eq!(
                &inst.qubits,
                &vec![pairs.control.qubits()[i], pairs.target.qubits()[i]]
            );
        }
    }

    #[test]
    fn prop_choi_width_doubles(n in 1u32..6) {
        let choi = embed_choi_state(&Circuit::qft(n).unwrap()).unwrap();
        prop_assert_eq!(choi.num_qubits(), 2 * n as usize);
    }
}
