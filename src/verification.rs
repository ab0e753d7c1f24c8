//! Spot-check of the reconciled key.
//!
//! Half of the reconciled positions are sampled without replacement and the
//! two parties' bits at those positions are compared. Where the receiver's
//! bits come from is a policy: `SampleSource::SenderCopy` reads both samples
//! from the sender's key, so it can never disagree; `ReceiverResults` reads
//! the receiver sample from the recorded measurement results.

use std::fmt;

use log::{info, warn};

use crate::bb84_states::{Bit, BitString};
use crate::error::{Result, SimulationError};
use crate::random::RandomSource;
use crate::reconciliation::ReconciledKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleSource {
    #[default]
    SenderCopy,
    ReceiverResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub outcome: VerificationOutcome,
    /// Indices into the reconciled key, in draw order.
    pub indices: Vec<usize>,
    pub sender_sample: Vec<Bit>,
    pub receiver_sample: Vec<Bit>,
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        self.outcome == VerificationOutcome::Verified
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Verification Subset Indices: {}", BitString(&self.indices))?;
        writeln!(f, "Sender's Verification Sample: {}", BitString(&self.sender_sample))?;
        writeln!(f, "Receiver's Verification Sample: {}", BitString(&self.receiver_sample))?;
        match self.outcome {
            VerificationOutcome::Verified => write!(f, "Key Verified: No eavesdropping detected!"),
            VerificationOutcome::Failed => {
                write!(f, "Key Verification Failed: Possible eavesdropping detected!")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier {
    source: SampleSource,
}

impl Verifier {
    pub fn new(source: SampleSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> SampleSource {
        self.source
    }

    /// Fails with `InvalidArgument` for keys shorter than two bits, where the
    /// sample would be empty.
    pub fn verify<R: RandomSource>(
        &self,
        key: &ReconciledKey,
        rng: &mut R,
    ) -> Result<Verification> {
        let len = key.len();
        if len < 2 {
            return Err(SimulationError::invalid_argument(
                "reconciled key",
                format!("need at least 2 bits to verify, got {}", len),
            ));
        }

        let indices = rng.choose_subset(len, len / 2)?;
        let receiver_bits = match self.source {
            SampleSource::SenderCopy => key.bits(),
            SampleSource::ReceiverResults => key.receiver_bits(),
        };
        let sender_sample: Vec<Bit> = indices.iter().map(|&i| key.bits()[i]).collect();
        let receiver_sample: Vec<Bit> = indices.iter().map(|&i| receiver_bits[i]).collect();

        let outcome = if sender_sample == receiver_sample {
            info!("verification passed on {} sampled bits", indices.len());
            VerificationOutcome::Verified
        } else {
            warn!("verification failed on {} sampled bits", indices.len());
            VerificationOutcome::Failed
        };

        Ok(Verification {
            outcome,
            indices,
            sender_sample,
            receiver_sample,
        })
    }
}
