use log::debug;

use crate::bb84_states::Bit;
use crate::error::{check_length, Result};

/// Outcome of parity-based error correction on the receiver's bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// Receiver bits after correction.
    pub bits: Vec<Bit>,
    /// Parity bits revealed over the public channel.
    pub disclosed: usize,
    /// Number of bits flipped.
    pub flipped: usize,
}

/// Cascade-style correction: passes over blocks of halving size, and for
/// every block whose parity disagrees a binary search by sub-block parity
/// locates and flips one error.
///
/// The last pass uses single-bit blocks, so errors hidden in even-parity
/// blocks by earlier passes are still found and the result matches the
/// sender's bits.
pub fn cascade_correction(sender: &[Bit], receiver: &[Bit]) -> Result<Correction> {
    check_length("receiver bits", sender.len(), receiver.len())?;

    let mut corrected = receiver.to_vec();
    let mut disclosed = 0;
    let mut flipped = 0;
    let mut block_size = determine_optimal_block_size(sender.len());

    while block_size > 0 {
        for start in (0..sender.len()).step_by(block_size) {
            let end = std::cmp::min(start + block_size, sender.len());
            disclosed += 1;
            if calculate_parity(&sender[start..end]) != calculate_parity(&corrected[start..end]) {
                let index = locate_error(sender, &corrected, start, end, &mut disclosed);
                corrected[index] = corrected[index].complement();
                flipped += 1;
            }
        }
        block_size /= 2; // Reduce block size for the next pass
    }

    debug!(
        "cascade corrected {} bits, disclosing {} parities",
        flipped, disclosed
    );
    Ok(Correction {
        bits: corrected,
        disclosed,
        flipped,
    })
}

fn determine_optimal_block_size(length: usize) -> usize {
    std::cmp::max(4, length / 8)
}

/// `true` for an odd number of ones.
fn calculate_parity(bits: &[Bit]) -> bool {
    bits.iter().filter(|b| b.is_one()).count() % 2 == 1
}

/// Bisects `[start, end)`, which holds an odd number of errors, down to a
/// single erroneous position.
fn locate_error(
    sender: &[Bit],
    receiver: &[Bit],
    mut start: usize,
    mut end: usize,
    disclosed: &mut usize,
) -> usize {
    while end - start > 1 {
        let mid = start + (end - start) / 2;
        *disclosed += 1;
        if calculate_parity(&sender[start..mid]) != calculate_parity(&receiver[start..mid]) {
            end = mid;
        } else {
            start = mid;
        }
    }
    start
}
