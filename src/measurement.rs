//! Measurement strategies and the receiving party.
//!
//! A strategy turns a qubit's operation log into a bit. The default,
//! `UniformMeasurement`, ignores the log entirely and samples a fixed
//! distribution: the simulation does not evolve quantum states, so outcomes
//! carry no information about what was prepared. Receiver and eavesdropper
//! both measure through this seam.

use log::debug;

use crate::bb84_states::{Basis, Bit, Qubit, QubitSequence};
use crate::error::{check_length, check_probability, Result};
use crate::random::RandomSource;

pub trait MeasurementStrategy {
    fn measure(&self, qubit: &Qubit, rng: &mut dyn RandomSource) -> Result<Bit>;
}

/// Outcome is 1 with probability `p_one`, independent of the qubit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformMeasurement {
    p_one: f64,
}

impl UniformMeasurement {
    pub fn new(p_one: f64) -> Result<Self> {
        check_probability("p_one", p_one)?;
        Ok(Self { p_one })
    }

    pub fn p_one(&self) -> f64 {
        self.p_one
    }
}

impl Default for UniformMeasurement {
    fn default() -> Self {
        Self { p_one: 0.5 }
    }
}

impl MeasurementStrategy for UniformMeasurement {
    fn measure(&self, _qubit: &Qubit, rng: &mut dyn RandomSource) -> Result<Bit> {
        Ok(Bit::from(rng.bernoulli(self.p_one)?))
    }
}

/// The receiving party: picks bases and measures the incoming qubits.
pub struct Receiver {
    strategy: Box<dyn MeasurementStrategy>,
}

impl Receiver {
    pub fn new(strategy: Box<dyn MeasurementStrategy>) -> Self {
        Self { strategy }
    }

    pub fn choose_bases<R: RandomSource>(n: usize, rng: &mut R) -> Vec<Basis> {
        rng.uniform_bits(n).into_iter().map(Basis::from).collect()
    }

    /// Measures qubit `i` in `bases[i]`, appending a rotation for the
    /// Hadamard basis and a measurement marker to each log.
    pub fn measure<R: RandomSource>(
        &self,
        qubits: &mut QubitSequence,
        bases: &[Basis],
        rng: &mut R,
    ) -> Result<Vec<Bit>> {
        check_length("receiver bases", qubits.len(), bases.len())?;

        let mut results = Vec::with_capacity(bases.len());
        for (qubit, &basis) in qubits.iter_mut().zip(bases) {
            if basis == Basis::Hadamard {
                qubit.rotate();
            }
            qubit.mark_measured();
            results.push(self.strategy.measure(qubit, rng)?);
        }
        debug!("receiver measured {} qubits", results.len());
        Ok(results)
    }
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new(Box::new(UniformMeasurement::default()))
    }
}
