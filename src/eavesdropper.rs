//! Intercept-resend eavesdropping.
//!
//! For each qubit Eve picks a random basis, rotates into it, measures, and
//! re-prepares the qubit from her result before rotating back so the
//! receiver sees a qubit in Eve's basis. Logging is optional; the qubits are
//! mutated identically either way.

use std::fmt;

use log::{debug, info};

use crate::bb84_states::{Basis, Bit, QubitSequence};
use crate::error::Result;
use crate::measurement::{MeasurementStrategy, UniformMeasurement};
use crate::random::RandomSource;

/// A single recorded step of Eve's interception. `qubit` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EveAction {
    BasisChoice { qubit: usize, basis: Basis },
    Measured { qubit: usize, value: Bit },
}

impl fmt::Display for EveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            EveAction::BasisChoice { qubit, basis } => {
                write!(f, "Qubit {}: Eve uses {} basis.", qubit + 1, basis)
            }
            EveAction::Measured { qubit, value } => {
                write!(f, "Qubit {}: Eve measures and gets {}.", qubit + 1, value)
            }
        }
    }
}

/// Ordered record of Eve's actions, two entries per intercepted qubit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EveLog {
    entries: Vec<EveAction>,
}

impl EveLog {
    pub fn entries(&self) -> &[EveAction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Eve's basis choices, in qubit order.
    pub fn bases(&self) -> Vec<Basis> {
        self.entries
            .iter()
            .filter_map(|entry| match *entry {
                EveAction::BasisChoice { basis, .. } => Some(basis),
                EveAction::Measured { .. } => None,
            })
            .collect()
    }

    /// Eve's measurement results, in qubit order.
    pub fn results(&self) -> Vec<Bit> {
        self.entries
            .iter()
            .filter_map(|entry| match *entry {
                EveAction::Measured { value, .. } => Some(value),
                EveAction::BasisChoice { .. } => None,
            })
            .collect()
    }

    fn record(&mut self, action: EveAction) {
        self.entries.push(action);
    }
}

impl fmt::Display for EveLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

pub struct Eavesdropper {
    strategy: Box<dyn MeasurementStrategy>,
    logging: bool,
}

impl Eavesdropper {
    pub fn new(strategy: Box<dyn MeasurementStrategy>) -> Self {
        Self {
            strategy,
            logging: true,
        }
    }

    /// With logging off `intercept` returns an empty log.
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    pub fn intercept<R: RandomSource>(
        &self,
        qubits: &mut QubitSequence,
        rng: &mut R,
    ) -> Result<EveLog> {
        let mut log = EveLog::default();

        for (i, qubit) in qubits.iter_mut().enumerate() {
            let basis = Basis::from(rng.uniform_bit());
            if basis == Basis::Hadamard {
                qubit.rotate();
            }
            let value = self.strategy.measure(qubit, rng)?;
            if value.is_one() {
                qubit.flip();
            }
            if basis == Basis::Hadamard {
                qubit.rotate();
            }

            if self.logging {
                log.record(EveAction::BasisChoice { qubit: i, basis });
                log.record(EveAction::Measured { qubit: i, value });
            }
        }

        if self.logging {
            info!("eavesdropper intercepted {} qubits", qubits.len());
        } else {
            debug!("eavesdropper intercepted {} qubits silently", qubits.len());
        }
        Ok(log)
    }
}

impl Default for Eavesdropper {
    fn default() -> Self {
        Self::new(Box::new(UniformMeasurement::default()))
    }
}
