//! Simulation tunables

use serde::{Deserialize, Serialize};

use crate::types::{Result, SimError};
use crate::{
    DISTANCE_VARIATION, MAX_DISTANCE, MAX_HISTORY_LENGTH, MAX_TREND_STEPS, MIN_DISTANCE,
    MIN_TREND_STEPS, OBSERVATION_NOISE, OPTIMAL_DISTANCE, TREND_CHANCE, TREND_INTENSITY_FACTOR,
    TREND_STRENGTH,
};

/// Parameters of the distance walk and its history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub min_distance: f64,
    pub max_distance: f64,
    pub optimal_distance: f64,
    pub distance_variation: f64,
    pub observation_noise: f64,
    pub trend_chance: f64,
    pub min_trend_steps: u32,
    pub max_trend_steps: u32,
    pub trend_strength: f64,
    pub history_length: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            optimal_distance: OPTIMAL_DISTANCE,
            distance_variation: DISTANCE_VARIATION,
            observation_noise: OBSERVATION_NOISE,
            trend_chance: TREND_CHANCE,
            min_trend_steps: MIN_TREND_STEPS,
            max_trend_steps: MAX_TREND_STEPS,
            trend_strength: TREND_STRENGTH,
            history_length: MAX_HISTORY_LENGTH,
        }
    }
}

impl SimConfig {
    /// Defaults overridden by `FACESIM_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from any key lookup; unparseable values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
            raw.and_then(|v| v.trim().parse().ok())
        }

        if let Some(v) = parsed(lookup("FACESIM_MIN_DISTANCE")) {
            self.min_distance = v;
        }
        if let Some(v) = parsed(lookup("FACESIM_MAX_DISTANCE")) {
            self.max_distance = v;
        }
        if let Some(v) = parsed(lookup("FACESIM_OPTIMAL_DISTANCE")) {
            self.optimal_distance = v;
        }
        if let Some(v) = parsed(lookup("FACESIM_DISTANCE_VARIATION")) {
            self.distance_variation = v;
        }
        if let Some(v) = parsed(lookup("FACESIM_TREND_CHANCE")) {
            self.trend_chance = v;
        }
        if let Some(v) = parsed(lookup("FACESIM_MAX_TREND_STEPS")) {
            self.max_trend_steps = v;
        }
        if let Some(v) = parsed(lookup("FACESIM_TREND_STRENGTH")) {
            self.trend_strength = v;
        }
        if let Some(v) = parsed(lookup("FACESIM_HISTORY_LENGTH")) {
            self.history_length = v;
        }
    }

    /// Reject tunables the walk cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.min_distance < self.max_distance) {
            return Err(SimError::Config(format!(
                "min_distance {} must be below max_distance {}",
                self.min_distance, self.max_distance
            )));
        }
        if !(self.min_distance..=self.max_distance).contains(&self.optimal_distance) {
            return Err(SimError::Config(format!(
                "optimal_distance {} outside [{}, {}]",
                self.optimal_distance, self.min_distance, self.max_distance
            )));
        }
        if !(self.distance_variation > 0.0 && self.observation_noise > 0.0) {
            return Err(SimError::Config(format!(
                "distance_variation {} and observation_noise {} must be positive",
                self.distance_variation, self.observation_noise
            )));
        }
        if !(0.0..=1.0).contains(&self.trend_chance) {
            return Err(SimError::Config(format!(
                "trend_chance {} outside [0, 1]",
                self.trend_chance
            )));
        }
        if self.min_trend_steps == 0 || self.min_trend_steps > self.max_trend_steps {
            return Err(SimError::Config(format!(
                "trend steps range [{}, {}] is empty",
                self.min_trend_steps, self.max_trend_steps
            )));
        }
        if self.history_length == 0 {
            return Err(SimError::Config("history_length must be positive".to_string()));
        }
        Ok(())
    }

    /// Per-step drift while a trend is active (before the direction sign)
    pub fn trend_intensity(&self) -> f64 {
        self.trend_strength * self.distance_variation * TREND_INTENSITY_FACTOR
    }
}
