//! Small statevector simulator for checking fold equivalence.
//!
//! Folding must leave the implemented unitary unchanged. This module
//! evolves |0…0⟩ through a circuit's gates and compares the resulting
//! states up to a global phase. Measurements are skipped: folded circuits
//! keep them terminal, so the pre-measurement state is what matters.

use alsvin_ir::{Circuit, CustomGate, Gate, Instruction, InstructionKind, StandardGate};
use num_complex::Complex64;
use thiserror::Error;

/// Errors raised by statevector simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The gate carries an unbound symbolic parameter.
    #[error("gate '{0}' has an unbound symbolic parameter")]
    SymbolicParameter(String),

    /// The gate has no matrix to simulate with.
    #[error("gate '{0}' has no unitary matrix")]
    MissingMatrix(String),
}

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn angle(gate: &StandardGate) -> Result<f64, SimError> {
    let params = gate.parameters();
    match params.first().and_then(|p| p.as_f64()) {
        Some(theta) => Ok(theta),
        None => Err(SimError::SymbolicParameter(gate.name().to_string())),
    }
}

fn bound(gate: &StandardGate, param: &alsvin_ir::ParameterExpression) -> Result<f64, SimError> {
    param
        .as_f64()
        .ok_or_else(|| SimError::SymbolicParameter(gate.name().to_string()))
}

/// Embed a single-qubit matrix as its controlled two-qubit version,
/// control on the first operand.
fn controlled(u: [Complex64; 4]) -> Vec<Complex64> {
    vec![
        ONE, ZERO, ZERO, ZERO, //
        ZERO, ONE, ZERO, ZERO, //
        ZERO, ZERO, u[0], u[1], //
        ZERO, ZERO, u[2], u[3],
    ]
}

fn single(gate: &StandardGate) -> Result<[Complex64; 4], SimError> {
    use std::f64::consts::FRAC_1_SQRT_2;
    let m = match gate {
        StandardGate::I => [ONE, ZERO, ZERO, ONE],
        StandardGate::X => [ZERO, ONE, ONE, ZERO],
        StandardGate::Y => [ZERO, c(0.0, -1.0), c(0.0, 1.0), ZERO],
        StandardGate::Z => [ONE, ZERO, ZERO, c(-1.0, 0.0)],
        StandardGate::H => [
            c(FRAC_1_SQRT_2, 0.0),
            c(FRAC_1_SQRT_2, 0.0),
            c(FRAC_1_SQRT_2, 0.0),
            c(-FRAC_1_SQRT_2, 0.0),
        ],
        StandardGate::S => [ONE, ZERO, ZERO, c(0.0, 1.0)],
        StandardGate::Sdg => [ONE, ZERO, ZERO, c(0.0, -1.0)],
        StandardGate::T => {
            let phase = Complex64::from_polar(1.0, std::f64::consts::FRAC_PI_4);
            [ONE, ZERO, ZERO, phase]
        }
        StandardGate::Tdg => {
            let phase = Complex64::from_polar(1.0, -std::f64::consts::FRAC_PI_4);
            [ONE, ZERO, ZERO, phase]
        }
        StandardGate::SX => [
            c(0.5, 0.5),
            c(0.5, -0.5),
            c(0.5, -0.5),
            c(0.5, 0.5),
        ],
        StandardGate::SXdg => [
            c(0.5, -0.5),
            c(0.5, 0.5),
            c(0.5, 0.5),
            c(0.5, -0.5),
        ],
        StandardGate::Rx(_) => {
            let theta = angle(gate)?;
            let (sin, cos) = (theta / 2.0).sin_cos();
            [c(cos, 0.0), c(0.0, -sin), c(0.0, -sin), c(cos, 0.0)]
        }
        StandardGate::Ry(_) => {
            let theta = angle(gate)?;
            let (sin, cos) = (theta / 2.0).sin_cos();
            [c(cos, 0.0), c(-sin, 0.0), c(sin, 0.0), c(cos, 0.0)]
        }
        StandardGate::Rz(_) => {
            let theta = angle(gate)?;
            [
                Complex64::from_polar(1.0, -theta / 2.0),
                ZERO,
                ZERO,
                Complex64::from_polar(1.0, theta / 2.0),
            ]
        }
        StandardGate::P(_) => {
            let theta = angle(gate)?;
            [ONE, ZERO, ZERO, Complex64::from_polar(1.0, theta)]
        }
        StandardGate::U(theta, phi, lambda) => {
            let theta = theta
                .as_f64()
                .ok_or_else(|| SimError::SymbolicParameter(gate.name().to_string()))?;
            let phi = phi
                .as_f64()
                .ok_or_else(|| SimError::SymbolicParameter(gate.name().to_string()))?;
            let lambda = lambda
                .as_f64()
                .ok_or_else(|| SimError::SymbolicParameter(gate.name().to_string()))?;
            let (sin, cos) = (theta / 2.0).sin_cos();
            [
                c(cos, 0.0),
                -Complex64::from_polar(sin, lambda),
                Complex64::from_polar(sin, phi),
                Complex64::from_polar(cos, phi + lambda),
            ]
        }
        _ => unreachable!("single() is only called for one-qubit gates"),
    };
    Ok(m)
}

/// Row-major unitary matrix of a gate, dimension 2^k for a k-qubit gate.
///
/// The first operand qubit is the most significant bit of the local basis
/// index.
pub fn gate_matrix(gate: &Gate) -> Result<Vec<Complex64>, SimError> {
    let matrix = match gate {
        Gate::Standard(std_gate) => match std_gate {
            StandardGate::CX => controlled(single(&StandardGate::X)?),
            StandardGate::CY => controlled(single(&StandardGate::Y)?),
            StandardGate::CZ => controlled(single(&StandardGate::Z)?),
            StandardGate::CH => controlled(single(&StandardGate::H)?),
            StandardGate::CRx(theta) => {
                controlled(single(&StandardGate::Rx(theta.clone()))?)
            }
            StandardGate::CRy(theta) => {
                controlled(single(&StandardGate::Ry(theta.clone()))?)
            }
            StandardGate::CRz(theta) => {
                controlled(single(&StandardGate::Rz(theta.clone()))?)
            }
            StandardGate::CP(theta) => {
                controlled(single(&StandardGate::P(theta.clone()))?)
            }
            StandardGate::Swap => vec![
                ONE, ZERO, ZERO, ZERO, //
                ZERO, ZERO, ONE, ZERO, //
                ZERO, ONE, ZERO, ZERO, //
                ZERO, ZERO, ZERO, ONE,
            ],
            StandardGate::RXX(theta) => {
                let theta = bound(std_gate, theta)?;
                let (sin, cos) = (theta / 2.0).sin_cos();
                let d = c(cos, 0.0);
                let a = c(0.0, -sin);
                vec![
                    d, ZERO, ZERO, a, //
                    ZERO, d, a, ZERO, //
                    ZERO, a, d, ZERO, //
                    a, ZERO, ZERO, d,
                ]
            }
            StandardGate::RYY(theta) => {
                let theta = bound(std_gate, theta)?;
                let (sin, cos) = (theta / 2.0).sin_cos();
                let d = c(cos, 0.0);
                let a = c(0.0, sin);
                let b = c(0.0, -sin);
                vec![
                    d, ZERO, ZERO, a, //
                    ZERO, d, b, ZERO, //
                    ZERO, b, d, ZERO, //
                    a, ZERO, ZERO, d,
                ]
            }
            StandardGate::RZZ(theta) => {
                let theta = bound(std_gate, theta)?;
                let plus = Complex64::from_polar(1.0, theta / 2.0);
                let minus = Complex64::from_polar(1.0, -theta / 2.0);
                vec![
                    minus, ZERO, ZERO, ZERO, //
                    ZERO, plus, ZERO, ZERO, //
                    ZERO, ZERO, plus, ZERO, //
                    ZERO, ZERO, ZERO, minus,
                ]
            }
            StandardGate::CCX => {
                let mut m = identity(8);
                m.swap_rows(8, 6, 7);
                m.0
            }
            StandardGate::CSwap => {
                let mut m = identity(8);
                m.swap_rows(8, 5, 6);
                m.0
            }
            one_qubit => single(one_qubit)?.to_vec(),
        },
        Gate::Custom(CustomGate {
            matrix: Some(matrix),
            ..
        }) => matrix.clone(),
        Gate::Custom(CustomGate { name, .. }) => {
            return Err(SimError::MissingMatrix(name.clone()));
        }
    };
    Ok(matrix)
}

struct Rows(Vec<Complex64>);

impl Rows {
    fn swap_rows(&mut self, dim: usize, a: usize, b: usize) {
        for col in 0..dim {
            self.0.swap(a * dim + col, b * dim + col);
        }
    }
}

fn identity(dim: usize) -> Rows {
    let mut m = vec![ZERO; dim * dim];
    for i in 0..dim {
        m[i * dim + i] = ONE;
    }
    Rows(m)
}

/// State of `n` qubits, amplitudes indexed with qubit 0 as the least
/// significant bit.
pub struct Statevector {
    num_qubits: usize,
    amps: Vec<Complex64>,
}

impl Statevector {
    /// The all-zeros state |0…0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let mut amps = vec![ZERO; 1 << num_qubits];
        amps[0] = ONE;
        Self { num_qubits, amps }
    }

    /// Evolve |0…0⟩ through all gates of the circuit, skipping
    /// measurements.
    pub fn from_circuit(circuit: &Circuit) -> Result<Self, SimError> {
        let mut state = Self::new(circuit.num_qubits());
        for instruction in circuit.instructions() {
            state.apply(instruction)?;
        }
        Ok(state)
    }

    /// The amplitudes of this state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amps
    }

    /// Apply one instruction to the state.
    pub fn apply(&mut self, instruction: &Instruction) -> Result<(), SimError> {
        let gate = match &instruction.kind {
            InstructionKind::Gate(gate) => gate,
            InstructionKind::Measure => return Ok(()),
        };
        let matrix = gate_matrix(gate)?;
        let k = instruction.qubits.len();
        let dim = 1usize << k;
        debug_assert_eq!(matrix.len(), dim * dim);

        // Bit positions of the operand qubits; qubits[0] maps to the most
        // significant bit of the local index to match gate_matrix().
        let bits: Vec<usize> = instruction
            .qubits
            .iter()
            .map(|q| q.index())
            .collect();
        let mask: usize = bits.iter().map(|&b| 1usize << b).sum();

        let mut scratch = vec![ZERO; dim];
        for base in 0..self.amps.len() {
            if base & mask != 0 {
                continue;
            }
            // Global indices of the 2^k amplitudes touched by this gate.
            let index_of = |local: usize| -> usize {
                let mut global = base;
                for (j, &bit) in bits.iter().enumerate() {
                    if local >> (k - 1 - j) & 1 == 1 {
                        global |= 1 << bit;
                    }
                }
                global
            };
            for (row, slot) in scratch.iter_mut().enumerate() {
                let mut acc = ZERO;
                for col in 0..dim {
                    acc += matrix[row * dim + col] * self.amps[index_of(col)];
                }
                *slot = acc;
            }
            for (local, &value) in scratch.iter().enumerate() {
                self.amps[index_of(local)] = value;
            }
        }
        Ok(())
    }
}

/// |⟨a|b⟩|, which is 1 exactly when the states agree up to a global phase.
pub fn fidelity(a: &Statevector, b: &Statevector) -> f64 {
    debug_assert_eq!(a.num_qubits, b.num_qubits);
    a.amps
        .iter()
        .zip(&b.amps)
        .map(|(x, y)| x.conj() * y)
        .sum::<Complex64>()
        .norm()
}

/// Whether two circuits implement the same state preparation from |0…0⟩,
/// up to a global phase.
pub fn states_equivalent(a: &Circuit, b: &Circuit, atol: f64) -> Result<bool, SimError> {
    let sa = Statevector::from_circuit(a)?;
    let sb = Statevector::from_circuit(b)?;
    Ok((fidelity(&sa, &sb) - 1.0).abs() < atol)
}
