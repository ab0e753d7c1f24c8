//! # bb84-sim
//!
//! Educational simulation of a BB84 key exchange between a sender and a
//! receiver, over a noisy channel, with an optional intercept-resend
//! eavesdropper.
//!
//! Qubits are not state vectors: each one is the ordered log of operations
//! (rotation, flip, measurement marker) applied to it since preparation.
//! Measurements go through a `MeasurementStrategy`; the default samples a
//! fixed distribution and ignores the log, so the simulation shows the
//! bookkeeping of the protocol rather than its physics.
//!
//! ## Usage
//!
//! ```no_run
//! use bb84_sim::prelude::*;
//!
//! let mut rng = RngSource::seeded(42);
//! let report = run_simulation(&SimulationConfig::default(), &mut rng).unwrap();
//! println!("{}", report);
//! ```

pub mod bb84;
pub mod bb84_states;
pub mod channel;
pub mod eavesdropper;
pub mod error;
pub mod error_correction;
pub mod measurement;
pub mod privacy_amplification;
pub mod random;
pub mod reconciliation;
pub mod simulation;
pub mod verification;

pub use error::{Result, SimulationError};

pub mod prelude {
    pub use crate::bb84::*;
    pub use crate::bb84_states::*;
    pub use crate::channel::*;
    pub use crate::eavesdropper::*;
    pub use crate::error::{Result, SimulationError};
    pub use crate::error_correction::*;
    pub use crate::measurement::*;
    pub use crate::privacy_amplification::*;
    pub use crate::random::*;
    pub use crate::reconciliation::*;
    pub use crate::simulation::*;
    pub use crate::verification::*;
}
