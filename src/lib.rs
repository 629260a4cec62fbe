//! facesim: simulated face telemetry for the realtime visualizer
//!
//! Stands in for a computer-vision pipeline: every frame yields a plausible
//! emotion estimate or face-to-screen distance, whether or not the image is
//! usable.
//!
//! Path: payload → assembler → (sampler | random walk → history) → JSON

pub mod core;
pub mod types;

// =============================================================================
// DISTANCE WALK [cm]
// =============================================================================

/// Closest the simulated face may get to the screen
pub const MIN_DISTANCE: f64 = 30.0;

/// Farthest the simulated face may get from the screen
pub const MAX_DISTANCE: f64 = 90.0;

/// Ideal viewing distance; starting point and fallback value
pub const OPTIMAL_DISTANCE: f64 = 50.0;

/// Standard deviation of the per-step random movement
pub const DISTANCE_VARIATION: f64 = 5.0;

/// Relative standard deviation of the multiplicative observation noise
pub const OBSERVATION_NOISE: f64 = 0.02;

// =============================================================================
// TRENDS
// =============================================================================

/// Chance per idle call of starting a trend
pub const TREND_CHANCE: f64 = 0.3;

/// Shortest trend episode (steps)
pub const MIN_TREND_STEPS: u32 = 3;

/// Longest trend episode (steps)
pub const MAX_TREND_STEPS: u32 = 8;

/// How strongly a trend pushes the walk (0-1)
pub const TREND_STRENGTH: f64 = 0.7;

/// Extra scale applied on top of strength * variation
pub const TREND_INTENSITY_FACTOR: f64 = 1.5;

// =============================================================================
// HISTORY
// =============================================================================

/// Readings kept for the line chart
pub const MAX_HISTORY_LENGTH: usize = 30;

// =============================================================================
// EMOTIONS
// =============================================================================

/// Relative weights for detecting 1, 2 or 3 emotions
pub const EMOTION_COUNT_WEIGHTS: [(usize, u32); 3] = [(1, 60), (2, 30), (3, 10)];

/// Labels weighted above this get a confidence boost
pub const BOOST_LIKELIHOOD_THRESHOLD: u32 = 15;

/// Largest confidence boost
pub const MAX_BOOST: u8 = 5;

/// Confidence scale bounds
pub const MIN_CONFIDENCE: u8 = 1;
pub const MAX_CONFIDENCE: u8 = 10;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
