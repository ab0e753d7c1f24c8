//! Error types for the BB84 simulation pipeline.

use thiserror::Error;

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors raised when a stage precondition is violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A parameter is outside its valid domain.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Two sequences that must correspond pairwise have different lengths.
    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Which sequence was checked.
        what: &'static str,
        /// Length of the reference sequence.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
}

impl SimulationError {
    /// Create an invalid argument error.
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what,
            expected,
            actual,
        }
    }
}

/// Fails with `InvalidArgument` unless `p` is a probability in `[0, 1]`.
pub(crate) fn check_probability(name: &'static str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(SimulationError::invalid_argument(
            name,
            format!("{} is not a probability in [0, 1]", p),
        ))
    }
}

/// Fails with `LengthMismatch` unless `actual == expected`.
pub(crate) fn check_length(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SimulationError::length_mismatch(what, expected, actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimulationError::length_mismatch("receiver bases", 10, 7);
        assert!(err.to_string().contains("receiver bases"));
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("7"));

        let err = SimulationError::invalid_argument("length", "must be positive");
        assert!(err.to_string().contains("length"));
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_probability_bounds() {
        assert!(check_probability("p", 0.0).is_ok());
        assert!(check_probability("p", 1.0).is_ok());
        assert!(check_probability("p", -0.01).is_err());
        assert!(check_probability("p", 1.5).is_err());
        assert!(check_probability("p", f64::NAN).is_err());
    }
}
