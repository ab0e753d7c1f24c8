use log::debug;

use crate::bb84_states::{Basis, Bit, Qubit, QubitSequence};
use crate::error::{Result, SimulationError};
use crate::random::RandomSource;

/// The sender's raw key together with the basis chosen for each bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBasisPair {
    key: Vec<Bit>,
    bases: Vec<Basis>,
}

impl KeyBasisPair {
    /// Pairs an existing key with its bases. Both must have the same,
    /// non-zero length.
    pub fn new(key: Vec<Bit>, bases: Vec<Basis>) -> Result<Self> {
        if key.is_empty() {
            return Err(SimulationError::invalid_argument(
                "key",
                "key must contain at least one bit",
            ));
        }
        if key.len() != bases.len() {
            return Err(SimulationError::length_mismatch(
                "sender bases",
                key.len(),
                bases.len(),
            ));
        }
        Ok(Self { key, bases })
    }

    pub fn key(&self) -> &[Bit] {
        &self.key
    }

    pub fn bases(&self) -> &[Basis] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Bit, Basis)> + '_ {
        self.key.iter().copied().zip(self.bases.iter().copied())
    }
}

/// Draws `length` key bits followed by `length` bases.
pub fn generate_key_and_basis<R: RandomSource>(
    length: usize,
    rng: &mut R,
) -> Result<KeyBasisPair> {
    if length == 0 {
        return Err(SimulationError::invalid_argument(
            "length",
            "key length must be positive",
        ));
    }
    let key = rng.uniform_bits(length);
    let bases = rng
        .uniform_bits(length)
        .into_iter()
        .map(Basis::from)
        .collect();
    debug!("generated {} key bits and bases", length);
    Ok(KeyBasisPair { key, bases })
}

/// Prepares one qubit: rotate for the Hadamard basis, then flip for a 1.
pub fn encode_qubit(bit: Bit, basis: Basis) -> Qubit {
    let mut qubit = Qubit::new();
    if basis == Basis::Hadamard {
        qubit.rotate();
    }
    if bit.is_one() {
        qubit.flip();
    }
    qubit
}

pub fn encode_qubits(pair: &KeyBasisPair) -> QubitSequence {
    pair.iter()
        .map(|(bit, basis)| encode_qubit(bit, basis))
        .collect()
}
