//! End-to-end protocol run.
//!
//! The pipeline:
//! 1. Sender draws a key and bases, then encodes the qubits
//! 2. The qubits cross the channel: noise and interception, in the
//!    configured order, each optional
//! 3. Receiver draws bases and measures
//! 4. Both parties sift on matching bases
//! 5. Half of the sifted key is spot-checked
//! 6. Optionally, error correction and privacy amplification

use std::fmt;

use log::{info, warn};

use crate::bb84::{encode_qubits, generate_key_and_basis, KeyBasisPair};
use crate::bb84_states::{Basis, Bit, BitString, QubitSequence};
use crate::channel::apply_noise;
use crate::eavesdropper::{Eavesdropper, EveLog};
use crate::error::{check_probability, Result, SimulationError};
use crate::error_correction::{cascade_correction, Correction};
use crate::measurement::{Receiver, UniformMeasurement};
use crate::privacy_amplification::{amplify, AmplifiedKey};
use crate::random::RandomSource;
use crate::reconciliation::{reconcile, ReconciledKey};
use crate::verification::{SampleSource, Verification, Verifier};

/// Where the eavesdropper sits relative to channel noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterceptPoint {
    BeforeNoise,
    #[default]
    AfterNoise,
}

/// Configuration for one protocol run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of raw key bits (and qubits) sent.
    pub key_length: usize,
    /// Per-qubit bit-flip probability; `None` for a noiseless channel.
    pub noise_probability: Option<f64>,
    /// Whether an eavesdropper intercepts every qubit.
    pub eavesdropper: bool,
    /// Whether the eavesdropper records her actions.
    pub eavesdropper_logging: bool,
    pub intercept_point: InterceptPoint,
    /// Probability that any measurement yields 1.
    pub measurement_one_probability: f64,
    /// Where the receiver-side verification sample is read from.
    pub verification: SampleSource,
    /// Run error correction and privacy amplification after verification.
    pub post_processing: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            key_length: 10,
            noise_probability: Some(0.1),
            eavesdropper: true,
            eavesdropper_logging: true,
            intercept_point: InterceptPoint::AfterNoise,
            measurement_one_probability: 0.5,
            verification: SampleSource::SenderCopy,
            post_processing: false,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.key_length == 0 {
            return Err(SimulationError::invalid_argument(
                "key_length",
                "key length must be positive",
            ));
        }
        if let Some(p) = self.noise_probability {
            check_probability("noise_probability", p)?;
        }
        check_probability("measurement_one_probability", self.measurement_one_probability)
    }
}

/// Error correction and privacy amplification results.
#[derive(Debug, Clone)]
pub struct PostProcessing {
    pub correction: Correction,
    /// `None` when correction disclosed as many parities as the key has bits.
    pub final_key: Option<AmplifiedKey>,
}

/// Everything a run produced, stage by stage.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub sender: KeyBasisPair,
    pub encoded: QubitSequence,
    /// Number of qubits flipped by the channel, if noise was enabled.
    pub noise_flips: Option<usize>,
    pub noise_probability: Option<f64>,
    pub eve_log: Option<EveLog>,
    /// Qubits as they reached the receiver, after measurement.
    pub received: QubitSequence,
    pub receiver_bases: Vec<Basis>,
    pub receiver_results: Vec<Bit>,
    pub reconciled: ReconciledKey,
    /// `None` when the reconciled key was too short to sample.
    pub verification: Option<Verification>,
    pub post_processing: Option<PostProcessing>,
}

/// Runs every stage once with fresh randomness from `rng`.
pub fn run_simulation<R: RandomSource>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<SimulationReport> {
    config.validate()?;
    let strategy = UniformMeasurement::new(config.measurement_one_probability)?;

    let sender = generate_key_and_basis(config.key_length, rng)?;
    let encoded = encode_qubits(&sender);
    info!("sender encoded {} qubits", encoded.len());

    let mut qubits = encoded.clone();
    let eavesdropper = config.eavesdropper.then(|| {
        Eavesdropper::new(Box::new(strategy)).with_logging(config.eavesdropper_logging)
    });

    let mut eve_log = None;
    if config.intercept_point == InterceptPoint::BeforeNoise {
        if let Some(eve) = &eavesdropper {
            eve_log = Some(eve.intercept(&mut qubits, rng)?);
        }
    }
    let noise_flips = match config.noise_probability {
        Some(p) => Some(apply_noise(&mut qubits, p, rng)?),
        None => None,
    };
    if config.intercept_point == InterceptPoint::AfterNoise {
        if let Some(eve) = &eavesdropper {
            eve_log = Some(eve.intercept(&mut qubits, rng)?);
        }
    }

    let receiver = Receiver::new(Box::new(strategy));
    let receiver_bases = Receiver::choose_bases(qubits.len(), rng);
    let receiver_results = receiver.measure(&mut qubits, &receiver_bases, rng)?;

    let reconciled = reconcile(
        sender.bases(),
        &receiver_bases,
        sender.key(),
        &receiver_results,
    )?;
    info!(
        "reconciled key has {} bits, error rate {:.3}",
        reconciled.len(),
        reconciled.error_rate()
    );

    let verification = if reconciled.len() < 2 {
        warn!(
            "reconciled key of {} bits is too short to verify",
            reconciled.len()
        );
        None
    } else {
        Some(Verifier::new(config.verification).verify(&reconciled, rng)?)
    };

    let verified = verification.as_ref().map_or(false, Verification::is_verified);
    let post_processing = if config.post_processing && verified {
        Some(post_process(&reconciled, rng)?)
    } else {
        None
    };

    Ok(SimulationReport {
        sender,
        encoded,
        noise_flips,
        noise_probability: config.noise_probability,
        eve_log,
        received: qubits,
        receiver_bases,
        receiver_results,
        reconciled,
        verification,
        post_processing,
    })
}

fn post_process<R: RandomSource>(key: &ReconciledKey, rng: &mut R) -> Result<PostProcessing> {
    let correction = cascade_correction(key.bits(), key.receiver_bits())?;
    let remaining = key.len().saturating_sub(correction.disclosed);
    let final_key = if remaining == 0 {
        warn!(
            "error correction disclosed {} parities for a {}-bit key; no secret bits remain",
            correction.disclosed,
            key.len()
        );
        None
    } else {
        Some(amplify(key.bits(), remaining, rng)?)
    };
    Ok(PostProcessing {
        correction,
        final_key,
    })
}

fn basis_labels(bases: &[Basis]) -> Vec<Bit> {
    bases.iter().map(|b| b.as_bit()).collect()
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sender's Key: {}", BitString(self.sender.key()))?;
        writeln!(f, "Sender's Basis: {}", BitString(&basis_labels(self.sender.bases())))?;

        writeln!(f, "\nSender has encoded the qubits.")?;
        for (i, qubit) in self.encoded.iter().enumerate() {
            writeln!(f, "Qubit {}: {}", i + 1, qubit)?;
        }

        if let (Some(p), Some(flips)) = (self.noise_probability, self.noise_flips) {
            writeln!(f, "\nNoise applied with probability {} ({} qubits flipped).", p, flips)?;
        }

        if let Some(log) = &self.eve_log {
            if log.is_empty() {
                writeln!(f, "\nEavesdropping has occurred.")?;
            } else {
                writeln!(f, "\nEve's Basis: {}", BitString(&basis_labels(&log.bases())))?;
                writeln!(f, "\nEve's Actions:")?;
                write!(f, "{}", log)?;
                writeln!(f, "\nEavesdropping has occurred with detailed logging.")?;
            }
        }

        writeln!(f, "\nReceiver's Basis: {}", BitString(&basis_labels(&self.receiver_bases)))?;
        writeln!(f, "Receiver's Measurement Results: {}", BitString(&self.receiver_results))?;

        writeln!(
            f,
            "\nShared Key (After Reconciliation): {}",
            BitString(self.reconciled.bits())
        )?;
        writeln!(f, "Key Length After Reconciliation: {}", self.reconciled.len())?;
        writeln!(
            f,
            "Quantum Bit Error Rate: {:.1}%",
            self.reconciled.error_rate() * 100.0
        )?;

        match &self.verification {
            Some(verification) => writeln!(f, "\n{}", verification)?,
            None => writeln!(f, "\nKey too short to verify.")?,
        }

        if let Some(post) = &self.post_processing {
            writeln!(
                f,
                "\nError Correction: {} bits flipped, {} parities disclosed.",
                post.correction.flipped, post.correction.disclosed
            )?;
            match &post.final_key {
                Some(key) => {
                    writeln!(f, "Final Key: {}", BitString(key.bits()))?;
                    writeln!(f, "Final Key Fingerprint: {}", key.fingerprint())?;
                }
                None => writeln!(f, "No secret bits remain after error correction.")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RngSource;

    #[test]
    fn simulation_runs_with_defaults() {
        let mut rng = RngSource::seeded(42);
        let report = run_simulation(&SimulationConfig::default(), &mut rng).unwrap();
        assert_eq!(report.sender.len(), 10);
        assert_eq!(report.received.len(), 10);
        assert_eq!(report.receiver_results.len(), 10);
        assert_eq!(report.eve_log.as_ref().map(EveLog::len), Some(20));
        assert!(report.reconciled.len() <= 10);
        let text = report.to_string();
        assert!(text.contains("Sender's Key:"));
        assert!(text.contains("Eve's Actions:"));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut rng = RngSource::seeded(1);
        let bad = [
            SimulationConfig {
                key_length: 0,
                ..Default::default()
            },
            SimulationConfig {
                noise_probability: Some(1.5),
                ..Default::default()
            },
            SimulationConfig {
                measurement_one_probability: -0.5,
                ..Default::default()
            },
        ];
        for config in &bad {
            let err = run_simulation(config, &mut rng).unwrap_err();
            assert!(matches!(err, SimulationError::InvalidArgument { .. }));
        }
    }

    #[test]
    fn noiseless_channel_without_eve_leaves_no_noise_trace() {
        let config = SimulationConfig {
            noise_probability: None,
            eavesdropper: false,
            ..Default::default()
        };
        let mut rng = RngSource::seeded(3);
        let report = run_simulation(&config, &mut rng).unwrap();
        assert!(report.noise_flips.is_none());
        assert!(report.eve_log.is_none());
        for (sent, received) in report.encoded.iter().zip(report.received.iter()) {
            assert!(received.operations().starts_with(sent.operations()));
        }
    }

    #[test]
    fn same_seed_same_report() {
        let config = SimulationConfig {
            key_length: 64,
            ..Default::default()
        };
        let a = run_simulation(&config, &mut RngSource::seeded(99)).unwrap();
        let b = run_simulation(&config, &mut RngSource::seeded(99)).unwrap();
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn post_processing_runs_after_verification() {
        let config = SimulationConfig {
            key_length: 2048,
            post_processing: true,
            ..Default::default()
        };
        let mut rng = RngSource::seeded(7);
        let report = run_simulation(&config, &mut rng).unwrap();
        let post = report.post_processing.expect("sender-copy verification always passes");
        assert_eq!(post.correction.bits.len(), report.reconciled.len());
        if let Some(key) = &post.final_key {
            assert_eq!(key.len(), report.reconciled.len() - post.correction.disclosed);
        }
    }
}
