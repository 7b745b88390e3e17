//! Single-qubit gate matrices.

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

use tnequiv_ir::{ParameterExpression, StandardGate};
use tnequiv_oracle::{OracleError, OracleResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A 2x2 matrix in row-major order: `[[a, b], [c, d]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2 {
    /// The matrix elements.
    pub data: [Complex64; 4],
}

impl Matrix2 {
    /// Create a matrix from its elements.
    pub const fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// The identity.
    pub const fn identity() -> Self {
        Self::new(ONE, ZERO, ZERO, ONE)
    }

    /// Hadamard.
    pub fn h() -> Self {
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        Self::new(s, s, s, -s)
    }

    /// Pauli-X.
    pub const fn x() -> Self {
        Self::new(ZERO, ONE, ONE, ZERO)
    }

    /// Pauli-Y.
    pub const fn y() -> Self {
        Self::new(ZERO, Complex64::new(0.0, -1.0), Complex64::new(0.0, 1.0), ZERO)
    }

    /// Pauli-Z.
    pub const fn z() -> Self {
        Self::new(ONE, ZERO, ZERO, Complex64::new(-1.0, 0.0))
    }

    /// Square root of X.
    pub fn sx() -> Self {
        let p = Complex64::new(0.5, 0.5);
        let m = Complex64::new(0.5, -0.5);
        Self::new(p, m, m, p)
    }

    /// Phase gate `diag(1, e^{iλ})`.
    pub fn p(lambda: f64) -> Self {
        Self::new(ONE, ZERO, ZERO, Complex64::from_polar(1.0, lambda))
    }

    /// X rotation.
    pub fn rx(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(0.0, -s),
            Complex64::new(0.0, -s),
            Complex64::new(c, 0.0),
        )
    }

    /// Y rotation.
    pub fn ry(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    /// Z rotation.
    pub fn rz(theta: f64) -> Self {
        Self::new(
            Complex64::from_polar(1.0, -theta / 2.0),
            ZERO,
            ZERO,
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// `U(θ, φ, λ)`.
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::new(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    /// Conjugate transpose.
    #[must_use]
    pub fn adjoint(&self) -> Self {
        let [a, b, c, d] = self.data;
        Self::new(a.conj(), c.conj(), b.conj(), d.conj())
    }
}

/// How a standard gate acts on the statevector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum GateAction {
    /// A 2x2 matrix on the last operand, controlled by all earlier operands.
    Controlled(Matrix2),
    /// Exchange of the last two operands, controlled by all earlier operands.
    ControlledSwap,
}

fn angle(gate: &StandardGate, expr: &ParameterExpression) -> OracleResult<f64> {
    expr.as_f64()
        .ok_or_else(|| OracleError::UnboundParameter(gate.name().to_string()))
}

/// Resolve a standard gate to its action.
pub(crate) fn gate_action(gate: &StandardGate) -> OracleResult<GateAction> {
    use GateAction::{Controlled, ControlledSwap};

    let action = match gate {
        StandardGate::I => Controlled(Matrix2::identity()),
        StandardGate::X | StandardGate::CX | StandardGate::CCX => Controlled(Matrix2::x()),
        StandardGate::Y | StandardGate::CY => Controlled(Matrix2::y()),
        StandardGate::Z | StandardGate::CZ => Controlled(Matrix2::z()),
        StandardGate::H | StandardGate::CH => Controlled(Matrix2::h()),
        StandardGate::S => Controlled(Matrix2::p(std::f64::consts::FRAC_PI_2)),
        StandardGate::Sdg => Controlled(Matrix2::p(-std::f64::consts::FRAC_PI_2)),
        StandardGate::T => Controlled(Matrix2::p(std::f64::consts::FRAC_PI_4)),
        StandardGate::Tdg => Controlled(Matrix2::p(-std::f64::consts::FRAC_PI_4)),
        StandardGate::SX => Controlled(Matrix2::sx()),
        StandardGate::SXdg => Controlled(Matrix2::sx().adjoint()),
        StandardGate::Rx(t) | StandardGate::CRx(t) => Controlled(Matrix2::rx(angle(gate, t)?)),
        StandardGate::Ry(t) | StandardGate::CRy(t) => Controlled(Matrix2::ry(angle(gate, t)?)),
        StandardGate::Rz(t) | StandardGate::CRz(t) => Controlled(Matrix2::rz(angle(gate, t)?)),
        StandardGate::P(t) | StandardGate::CP(t) => Controlled(Matrix2::p(angle(gate, t)?)),
        StandardGate::U(theta, phi, lambda) => Controlled(Matrix2::u(
            angle(gate, theta)?,
            angle(gate, phi)?,
            angle(gate, lambda)?,
        )),
        StandardGate::Swap | StandardGate::CSwap => ControlledSwap,
    };
    Ok(action)
}
