//! Distance Engine: trend-driven random walk with observation noise
//!
//! States:
//! - IDLE: each call starts a trend with probability `trend_chance`
//! - TRENDING: fixed directional push per call until the steps run out
//!
//! Per call:
//!   new   = clamp(last + N(0, variation) + trend, min, max)   (persisted)
//!   noisy = new * (1 + N(0, observation_noise))                (returned, not clamped)

use tracing::{debug, info, warn};

use crate::core::source::SignalSource;
use crate::types::{DistanceState, Result, SimConfig, SimError, TrendDirection};

/// Random-walk engine owning its persisted state
#[derive(Debug, Clone)]
pub struct DistanceEngine {
    config: SimConfig,
    state: DistanceState,
    update_count: u64,
}

impl Default for DistanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceEngine {
    /// Engine with default tunables at the optimal distance
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Engine starting idle at `config.optimal_distance`
    pub fn with_config(config: SimConfig) -> Self {
        let state = DistanceState::starting_at(config.optimal_distance);
        Self::with_state(config, state)
    }

    /// Resume from host-supplied state
    pub fn with_state(config: SimConfig, state: DistanceState) -> Self {
        Self {
            config,
            state,
            update_count: 0,
        }
    }

    /// Advance the walk one step and return the observed distance
    ///
    /// State is committed only if every draw succeeds.
    pub fn step<S: SignalSource + ?Sized>(&mut self, source: &mut S) -> Result<f64> {
        let mut next = self.state;
        let observed = self.advance(&mut next, source)?;
        self.state = next;
        self.update_count += 1;
        debug!(distance = observed, last_distance = self.state.last_distance, "Simulated distance");
        Ok(observed)
    }

    /// Like `step`, but a failure yields the optimal distance
    pub fn next_distance<S: SignalSource + ?Sized>(&mut self, source: &mut S) -> f64 {
        match self.step(source) {
            Ok(distance) => distance,
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Error in distance simulation, using optimal distance");
                self.config.optimal_distance
            }
        }
    }

    fn advance<S: SignalSource + ?Sized>(&self, state: &mut DistanceState, source: &mut S) -> Result<f64> {
        let cfg = &self.config;
        if cfg.min_distance.is_nan() || cfg.max_distance.is_nan() || cfg.min_distance > cfg.max_distance {
            return Err(SimError::Generation(format!(
                "invalid distance range [{}, {}]",
                cfg.min_distance, cfg.max_distance
            )));
        }

        if state.trend_steps_remaining == 0 && source.unit()? < cfg.trend_chance {
            state.trend_direction = if source.coin()? {
                TrendDirection::Closer
            } else {
                TrendDirection::Away
            };
            state.trend_steps_remaining = source.int_inclusive(cfg.min_trend_steps, cfg.max_trend_steps)?;
            info!(
                direction = state.trend_direction.describe(),
                steps = state.trend_steps_remaining,
                "Starting new trend"
            );
        }

        let random_movement = source.normal(0.0, cfg.distance_variation)?;

        let mut trend_movement = 0.0;
        if state.trend_steps_remaining > 0 {
            trend_movement = state.trend_direction.sign() * cfg.trend_intensity();
            state.trend_steps_remaining -= 1;
            if state.trend_steps_remaining == 0 {
                info!("Trend movement completed");
                state.trend_direction = TrendDirection::None;
            }
        }

        let raw = state.last_distance + random_movement + trend_movement;
        if !raw.is_finite() {
            return Err(SimError::Generation(format!("non-finite distance {}", raw)));
        }
        let clamped = raw.clamp(cfg.min_distance, cfg.max_distance);
        state.last_distance = clamped;

        let noisy = clamped * (1.0 + source.normal(0.0, cfg.observation_noise)?);
        if !noisy.is_finite() {
            return Err(SimError::Generation(format!("non-finite observation {}", noisy)));
        }

        Ok(round_one_decimal(noisy))
    }

    pub fn state(&self) -> &DistanceState {
        &self.state
    }

    pub fn last_distance(&self) -> f64 {
        self.state.last_distance
    }

    pub fn trend_steps_remaining(&self) -> u32 {
        self.state.trend_steps_remaining
    }

    /// Successful steps since construction
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// =============================================================================
// TESTS
// =============================================================================
