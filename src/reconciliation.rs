//! Basis sifting: keep only the positions where both parties used the same
//! basis.

use log::debug;

use crate::bb84_states::{Basis, Bit};
use crate::error::{check_length, Result};

/// Sender key bits at the positions where the bases agreed.
///
/// The receiver's results at the same positions are kept alongside; they
/// never contribute to the key itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledKey {
    indices: Vec<usize>,
    sender: Vec<Bit>,
    receiver: Vec<Bit>,
}

impl ReconciledKey {
    /// The shared key (sender side).
    pub fn bits(&self) -> &[Bit] {
        &self.sender
    }

    /// Receiver results at the kept positions.
    pub fn receiver_bits(&self) -> &[Bit] {
        &self.receiver
    }

    /// Positions in the raw transmission that survived sifting.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }

    /// Kept positions where the receiver's result differs from the sender bit.
    pub fn error_count(&self) -> usize {
        self.sender
            .iter()
            .zip(&self.receiver)
            .filter(|(s, r)| s != r)
            .count()
    }

    /// Quantum bit error rate over the kept positions; 0 for an empty key.
    pub fn error_rate(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.error_count() as f64 / self.len() as f64
        }
    }
}

pub fn reconcile(
    sender_bases: &[Basis],
    receiver_bases: &[Basis],
    sender_key: &[Bit],
    receiver_results: &[Bit],
) -> Result<ReconciledKey> {
    let n = sender_bases.len();
    check_length("receiver bases", n, receiver_bases.len())?;
    check_length("sender key", n, sender_key.len())?;
    check_length("receiver results", n, receiver_results.len())?;

    let mut key = ReconciledKey::default();
    for i in 0..n {
        if sender_bases[i] == receiver_bases[i] {
            key.indices.push(i);
            key.sender.push(sender_key[i]);
            key.receiver.push(receiver_results[i]);
        }
    }
    debug!("sifting kept {} of {} positions", key.len(), n);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bb84_states::bits;
    use crate::error::SimulationError;

    fn bases(values: &[u8]) -> Vec<Basis> {
        bits(values).into_iter().map(Basis::from).collect()
    }

    #[test]
    fn test_keeps_sender_bits_where_bases_match() {
        let sender_bases = bases(&[0, 1, 1, 0, 1]);
        let receiver_bases = bases(&[0, 0, 1, 1, 1]);
        let key = bits(&[1, 1, 0, 1, 1]);
        let results = bits(&[0, 0, 0, 0, 0]);

        let sifted = reconcile(&sender_bases, &receiver_bases, &key, &results).unwrap();
        assert_eq!(sifted.indices(), &[0, 2, 4]);
        assert_eq!(sifted.bits(), bits(&[1, 0, 1]).as_slice());
        assert_eq!(sifted.receiver_bits(), bits(&[0, 0, 0]).as_slice());
        assert_eq!(sifted.error_count(), 2);
    }

    #[test]
    fn test_receiver_results_do_not_shape_key() {
        let b = bases(&[0, 1, 0]);
        let key = bits(&[1, 0, 1]);
        let a = reconcile(&b, &b, &key, &bits(&[0, 0, 0])).unwrap();
        let c = reconcile(&b, &b, &key, &bits(&[1, 1, 1])).unwrap();
        assert_eq!(a.bits(), c.bits());
    }

    #[test]
    fn test_length_mismatch() {
        let b = bases(&[0, 1, 0]);
        let key = bits(&[1, 0, 1]);
        let err = reconcile(&b, &b[..2], &key, &key).unwrap_err();
        assert_eq!(err, SimulationError::length_mismatch("receiver bases", 3, 2));
        let err = reconcile(&b, &b, &key, &key[..1]).unwrap_err();
        assert_eq!(err, SimulationError::length_mismatch("receiver results", 3, 1));
    }

    #[test]
    fn test_error_rate_of_empty_key() {
        let key = ReconciledKey::default();
        assert_eq!(key.error_rate(), 0.0);
    }
}
