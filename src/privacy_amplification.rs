use log::debug;
use ring::digest::{self, SHA256};

use crate::bb84_states::Bit;
use crate::error::{check_length, Result, SimulationError};
use crate::random::RandomSource;

/// Final key after privacy amplification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmplifiedKey {
    bits: Vec<Bit>,
}

impl AmplifiedKey {
    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bits_to_bytes(&self.bits)
    }

    /// Hex SHA-256 of the packed key bytes.
    pub fn fingerprint(&self) -> String {
        hex::encode(digest::digest(&SHA256, &self.to_bytes()).as_ref())
    }
}

/// Packs bits eight to a byte, least significant bit first.
fn bits_to_bytes(bits: &[Bit]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0, |acc, (i, &bit)| acc | ((bit.is_one() as u8) << i))
        })
        .collect()
}

/// Multiplies `key` by the `output_len × key.len()` Toeplitz matrix whose
/// entry `(i, j)` is `seed[i - j + key.len() - 1]`.
///
/// `seed` must hold `key.len() + output_len - 1` bits.
pub fn toeplitz_hash(key: &[Bit], seed: &[Bit], output_len: usize) -> Result<Vec<Bit>> {
    let n = key.len();
    check_length("toeplitz seed", (n + output_len).saturating_sub(1), seed.len())?;

    let hashed = (0..output_len)
        .map(|i| {
            let mut hash_bit = false;
            for (j, key_bit) in key.iter().enumerate() {
                // AND with the matrix entry, XOR into the accumulator
                hash_bit ^= key_bit.is_one() && seed[i + n - 1 - j].is_one();
            }
            Bit::from(hash_bit)
        })
        .collect();
    Ok(hashed)
}

/// Compresses `key` to `output_len` bits with a freshly drawn Toeplitz seed.
pub fn amplify<R: RandomSource>(
    key: &[Bit],
    output_len: usize,
    rng: &mut R,
) -> Result<AmplifiedKey> {
    if output_len == 0 || output_len > key.len() {
        return Err(SimulationError::invalid_argument(
            "output_len",
            format!("must be in 1..={}, got {}", key.len(), output_len),
        ));
    }
    let seed = rng.uniform_bits(key.len() + output_len - 1);
    let bits = toeplitz_hash(key, &seed, output_len)?;
    debug!("amplified {} bits down to {}", key.len(), bits.len());
    Ok(AmplifiedKey { bits })
}
