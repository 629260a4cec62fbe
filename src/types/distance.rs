//! Distance walk state and readings

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::OPTIMAL_DISTANCE;

/// Direction of an active trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Drifting away from the screen
    Away,
    /// No trend
    #[default]
    None,
    /// Drifting toward the screen
    Closer,
}

impl TrendDirection {
    /// -1, 0 or +1
    pub fn sign(&self) -> f64 {
        match self {
            TrendDirection::Away => -1.0,
            TrendDirection::None => 0.0,
            TrendDirection::Closer => 1.0,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TrendDirection::Away => "moving away",
            TrendDirection::None => "steady",
            TrendDirection::Closer => "moving closer",
        }
    }
}

/// Persisted random-walk state
///
/// `last_distance` is the clamped pre-noise value; observation noise is never
/// written back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceState {
    pub last_distance: f64,
    pub trend_direction: TrendDirection,
    pub trend_steps_remaining: u32,
}

impl Default for DistanceState {
    fn default() -> Self {
        Self::starting_at(OPTIMAL_DISTANCE)
    }
}

impl DistanceState {
    /// Idle state at the given distance
    pub fn starting_at(distance: f64) -> Self {
        Self {
            last_distance: distance,
            trend_direction: TrendDirection::None,
            trend_steps_remaining: 0,
        }
    }
}

/// One timestamped distance sample as sent to the line chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceReading {
    /// ISO-8601 local time
    pub timestamp: String,
    /// Centimetres, one decimal
    pub distance: f64,
}

impl DistanceReading {
    pub fn new(timestamp: impl Into<String>, distance: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            distance,
        }
    }

    /// Reading stamped with the current time
    pub fn now(distance: f64) -> Self {
        Self::new(format_timestamp(), distance)
    }

    /// Optimal distance at the current time
    pub fn fallback() -> Self {
        Self::now(OPTIMAL_DISTANCE)
    }
}

/// Current local time as `YYYY-MM-DDTHH:MM:SS.ffffff`
pub fn format_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
