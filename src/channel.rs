//! Bit-flip noise on the quantum channel.

use log::debug;

use crate::bb84_states::QubitSequence;
use crate::error::{check_probability, Result};
use crate::random::RandomSource;

/// Independently appends a flip to each qubit with probability `p`.
///
/// Returns the number of qubits flipped. An out-of-range `p` is rejected
/// before any qubit is touched.
pub fn apply_noise<R: RandomSource>(
    qubits: &mut QubitSequence,
    p: f64,
    rng: &mut R,
) -> Result<usize> {
    check_probability("noise_probability", p)?;

    let mut flipped = 0;
    for qubit in qubits.iter_mut() {
        if rng.bernoulli(p)? {
            qubit.flip();
            flipped += 1;
        }
    }
    debug!("channel noise p={} flipped {} of {} qubits", p, flipped, qubits.len());
    Ok(flipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bb84::{encode_qubits, generate_key_and_basis};
    use crate::bb84_states::Operation;
    use crate::error::SimulationError;
    use crate::random::RngSource;

    fn encoded(n: usize, seed: u64) -> (QubitSequence, RngSource<rand::rngs::StdRng>) {
        let mut rng = RngSource::seeded(seed);
        let pair = generate_key_and_basis(n, &mut rng).unwrap();
        (encode_qubits(&pair), rng)
    }

    #[test]
    fn zero_noise_leaves_logs_unchanged() {
        let (mut qubits, mut rng) = encoded(50, 1);
        let before = qubits.clone();
        assert_eq!(apply_noise(&mut qubits, 0.0, &mut rng).unwrap(), 0);
        assert_eq!(qubits, before);
    }

    #[test]
    fn full_noise_flips_every_qubit() {
        let (mut qubits, mut rng) = encoded(50, 2);
        let before = qubits.clone();
        assert_eq!(apply_noise(&mut qubits, 1.0, &mut rng).unwrap(), 50);
        for (old, new) in before.iter().zip(qubits.iter()) {
            let ops = new.operations();
            assert_eq!(ops.len(), old.operations().len() + 1);
            assert_eq!(&ops[..ops.len() - 1], old.operations());
            assert_eq!(ops.last(), Some(&Operation::Flip));
        }
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let (mut qubits, mut rng) = encoded(8, 3);
        let before = qubits.clone();
        for p in [-0.1, 1.01, f64::NAN] {
            let err = apply_noise(&mut qubits, p, &mut rng).unwrap_err();
            assert!(matches!(err, SimulationError::InvalidArgument { .. }));
        }
        assert_eq!(qubits, before);
    }

    #[test]
    fn noise_preserves_length() {
        let (mut qubits, mut rng) = encoded(40, 4);
        apply_noise(&mut qubits, 0.3, &mut rng).unwrap();
        assert_eq!(qubits.len(), 40);
    }
}
