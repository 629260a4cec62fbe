//! Signal source: every random draw the generators make goes through here
//!
//! Production code wraps a seeded `rand` generator; tests script the draws.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

use crate::types::{Result, SimError};

/// Provider of the random draws used by the sampler and the walk
pub trait SignalSource {
    /// Uniform float in [0, 1)
    fn unit(&mut self) -> Result<f64>;

    /// Index into `weights`, chosen proportionally to its weight
    fn weighted_index(&mut self, weights: &[u32]) -> Result<usize>;

    /// Uniform integer in `[low, high]`
    fn int_inclusive(&mut self, low: u32, high: u32) -> Result<u32>;

    /// Fair coin
    fn coin(&mut self) -> Result<bool>;

    /// Sample from Normal(mean, std_dev)
    fn normal(&mut self, mean: f64, std_dev: f64) -> Result<f64>;
}

/// `SignalSource` backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

/// Source used by the binary and the service
pub type DefaultSource = RngSource<StdRng>;

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible stream
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Seeded from wall-clock nanoseconds
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self::seeded(nanos as u64)
    }
}

impl<R: Rng> SignalSource for RngSource<R> {
    fn unit(&mut self) -> Result<f64> {
        Ok(self.rng.gen::<f64>())
    }

    fn weighted_index(&mut self, weights: &[u32]) -> Result<usize> {
        let dist: WeightedIndex<u32> = WeightedIndex::new(weights)
            .map_err(|e| SimError::Generation(format!("bad weights {:?}: {}", weights, e)))?;
        Ok(dist.sample(&mut self.rng))
    }

    fn int_inclusive(&mut self, low: u32, high: u32) -> Result<u32> {
        if low > high {
            return Err(SimError::Generation(format!("empty range [{}, {}]", low, high)));
        }
        Ok(self.rng.gen_range(low..=high))
    }

    fn coin(&mut self) -> Result<bool> {
        Ok(self.rng.gen_bool(0.5))
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> Result<f64> {
        let dist = Normal::new(mean, std_dev).map_err(|e| {
            SimError::Generation(format!("normal({}, {}): {}", mean, std_dev, e))
        })?;
        Ok(dist.sample(&mut self.rng))
    }
}

/// Replays pre-recorded draws in order
///
/// Each kind of draw has its own queue. Running a queue dry is a
/// `SimError::Generation`, which makes failure paths easy to provoke.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    units: VecDeque<f64>,
    indices: VecDeque<usize>,
    ints: VecDeque<u32>,
    coins: VecDeque<bool>,
    normals: VecDeque<f64>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(values);
        self
    }

    pub fn indices(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(values);
        self
    }

    pub fn ints(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.ints.extend(values);
        self
    }

    pub fn coins(mut self, values: impl IntoIterator<Item = bool>) -> Self {
        self.coins.extend(values);
        self
    }

    /// Values returned verbatim, ignoring the requested mean and deviation
    pub fn normals(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.normals.extend(values);
        self
    }

    /// True once every queue is drained
    pub fn is_exhausted(&self) -> bool {
        self.units.is_empty()
            && self.indices.is_empty()
            && self.ints.is_empty()
            && self.coins.is_empty()
            && self.normals.is_empty()
    }
}

fn next_scripted<T>(queue: &mut VecDeque<T>, what: &str) -> Result<T> {
    queue
        .pop_front()
        .ok_or_else(|| SimError::Generation(format!("script exhausted: {}", what)))
}

impl SignalSource for ScriptedSource {
    fn unit(&mut self) -> Result<f64> {
        next_scripted(&mut self.units, "unit")
    }

    fn weighted_index(&mut self, weights: &[u32]) -> Result<usize> {
        let idx = next_scripted(&mut self.indices, "weighted_index")?;
        if idx >= weights.len() {
            return Err(SimError::Generation(format!(
                "scripted index {} out of {} weights",
                idx,
                weights.len()
            )));
        }
        Ok(idx)
    }

    fn int_inclusive(&mut self, low: u32, high: u32) -> Result<u32> {
        let v = next_scripted(&mut self.ints, "int_inclusive")?;
        if v < low || v > high {
            return Err(SimError::Generation(format!(
                "scripted int {} outside [{}, {}]",
                v, low, high
            )));
        }
        Ok(v)
    }

    fn coin(&mut self) -> Result<bool> {
        next_scripted(&mut self.coins, "coin")
    }

    fn normal(&mut self, _mean: f64, _std_dev: f64) -> Result<f64> {
        next_scripted(&mut self.normals, "normal")
    }
}
