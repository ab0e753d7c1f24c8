//! Sources of randomness for every stochastic decision in the pipeline.
//!
//! Stages never reach for a global generator: they borrow a `RandomSource`
//! so tests can script every draw.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bb84_states::Bit;
use crate::error::{check_probability, Result, SimulationError};

pub trait RandomSource {
    /// One uniform bit.
    fn uniform_bit(&mut self) -> Bit;

    /// `k` distinct indices in `[0, n)`, in draw order.
    fn choose_subset(&mut self, n: usize, k: usize) -> Result<Vec<usize>>;

    /// `true` with probability `p`.
    fn bernoulli(&mut self, p: f64) -> Result<bool>;

    fn uniform_bits(&mut self, n: usize) -> Vec<Bit> {
        (0..n).map(|_| self.uniform_bit()).collect()
    }
}

fn check_subset(n: usize, k: usize) -> Result<()> {
    if k > n {
        return Err(SimulationError::invalid_argument(
            "k",
            format!("cannot choose {} distinct indices from {}", k, n),
        ));
    }
    Ok(())
}

/// `RandomSource` backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible source: the same seed yields the same run.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform_bit(&mut self) -> Bit {
        Bit::from(self.rng.gen::<bool>())
    }

    fn choose_subset(&mut self, n: usize, k: usize) -> Result<Vec<usize>> {
        check_subset(n, k)?;
        Ok(rand::seq::index::sample(&mut self.rng, n, k).into_vec())
    }

    fn bernoulli(&mut self, p: f64) -> Result<bool> {
        check_probability("p", p)?;
        Ok(self.rng.gen_bool(p))
    }
}

/// Deterministic source for tests.
///
/// Bits cycle through `script`; `bernoulli(p)` compares the next scripted
/// draw against `p`; `choose_subset(n, k)` always returns `0..k`.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ScriptedSource {
    script: Vec<Bit>,
    draws: Vec<f64>,
    next_bit: usize,
    next_draw: usize,
}

#[cfg(test)]
impl ScriptedSource {
    /// Panics on an empty script.
    pub(crate) fn new(script: Vec<Bit>) -> Self {
        assert!(!script.is_empty(), "bit script must not be empty");
        Self {
            script,
            draws: vec![0.5],
            next_bit: 0,
            next_draw: 0,
        }
    }

    /// A source that only ever yields `bit`.
    pub(crate) fn constant(bit: Bit) -> Self {
        Self::new(vec![bit])
    }

    /// Replaces the uniform draws consulted by `bernoulli`. Panics on an
    /// empty list.
    pub(crate) fn with_draws(mut self, draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "draw script must not be empty");
        self.draws = draws;
        self.next_draw = 0;
        self
    }

    /// Number of bits handed out so far.
    pub(crate) fn bits_consumed(&self) -> usize {
        self.next_bit
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn uniform_bit(&mut self) -> Bit {
        let bit = self.script[self.next_bit % self.script.len()];
        self.next_bit += 1;
        bit
    }

    fn choose_subset(&mut self, n: usize, k: usize) -> Result<Vec<usize>> {
        check_subset(n, k)?;
        Ok((0..k).collect())
    }

    fn bernoulli(&mut self, p: f64) -> Result<bool> {
        check_probability("p", p)?;
        let draw = self.draws[self.next_draw % self.draws.len()];
        self.next_draw += 1;
        Ok(draw < p)
    }
}
