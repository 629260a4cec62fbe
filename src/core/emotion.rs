//! Emotion Sampler: weighted multi-label draw with bounded confidences
//!
//! 1. Pick how many emotions to report (1-3, weights 60/30/10)
//! 2. Draw that many labels with replacement, keep first occurrences
//! 3. Score each label 1-10, boosting labels weighted above 15
//!
//! Duplicates are dropped, not re-drawn: a draw of three can report one.

use tracing::{debug, warn};

use crate::core::source::SignalSource;
use crate::types::{EmotionLabel, EmotionReading, Result, SimError};
use crate::{
    BOOST_LIKELIHOOD_THRESHOLD, EMOTION_COUNT_WEIGHTS, MAX_BOOST, MAX_CONFIDENCE, MIN_CONFIDENCE,
};

/// Stateless sampler over the fixed emotion table
#[derive(Debug, Default, Clone, Copy)]
pub struct EmotionSampler;

impl EmotionSampler {
    pub fn new() -> Self {
        Self
    }

    /// Draw 1-3 unique emotions
    pub fn sample<S: SignalSource + ?Sized>(&self, source: &mut S) -> Result<Vec<EmotionReading>> {
        let count = self.draw_count(source)?;

        let label_weights: Vec<u32> = EmotionLabel::ALL.iter().map(|l| l.likelihood()).collect();
        let mut labels: Vec<EmotionLabel> = Vec::with_capacity(count);
        for _ in 0..count {
            let idx = source.weighted_index(&label_weights)?;
            let label = *EmotionLabel::ALL
                .get(idx)
                .ok_or_else(|| SimError::Generation(format!("label index {} out of range", idx)))?;
            if !labels.contains(&label) {
                labels.push(label);
            }
        }

        let mut readings = Vec::with_capacity(labels.len());
        for label in labels {
            readings.push(EmotionReading::new(label, self.confidence(label, source)?));
        }

        debug!(requested = count, readings = ?readings, "Simulated emotion detection");
        Ok(readings)
    }

    /// Like `sample`, but any failure or empty draw becomes `[neutral: 1]`
    pub fn sample_or_fallback<S: SignalSource + ?Sized>(&self, source: &mut S) -> Vec<EmotionReading> {
        match self.sample(source) {
            Ok(readings) if !readings.is_empty() => readings,
            Ok(_) => {
                warn!(error = %SimError::EmptyResult, "No emotions detected, using fallback");
                vec![EmotionReading::fallback()]
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Error in emotion simulation, using fallback");
                vec![EmotionReading::fallback()]
            }
        }
    }

    fn draw_count<S: SignalSource + ?Sized>(&self, source: &mut S) -> Result<usize> {
        let weights: Vec<u32> = EMOTION_COUNT_WEIGHTS.iter().map(|(_, w)| *w).collect();
        let idx = source.weighted_index(&weights)?;
        EMOTION_COUNT_WEIGHTS
            .get(idx)
            .map(|(count, _)| *count)
            .ok_or_else(|| SimError::Generation(format!("count index {} out of range", idx)))
    }

    /// `min(10, base + boost)`; the boost draw only happens for likely labels
    fn confidence<S: SignalSource + ?Sized>(&self, label: EmotionLabel, source: &mut S) -> Result<u8> {
        let base = source.int_inclusive(MIN_CONFIDENCE as u32, MAX_CONFIDENCE as u32)?;
        let boost = if label.likelihood() > BOOST_LIKELIHOOD_THRESHOLD {
            source.int_inclusive(0, MAX_BOOST as u32)?
        } else {
            0
        };
        Ok((base + boost).min(MAX_CONFIDENCE as u32) as u8)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::{RngSource, ScriptedSource};
    use std::collections::HashSet;

    const NEUTRAL: usize = 0;
    const HAPPY: usize = 1;
    const SAD: usize = 2;
    const SURPRISED: usize = 4;

    #[test]
    fn test_single_unboosted_label() {
        let sampler = EmotionSampler::new();
        // count=1, label=sad, base=4
        let mut src = ScriptedSource::new().indices([0, SAD]).ints([4]);

        let readings = sampler.sample(&mut src).unwrap();
        assert_eq!(readings, vec![EmotionReading::new(EmotionLabel::Sad, 4)]);
        assert!(src.is_exhausted());
    }

    #[test]
    fn test_boost_is_capped_at_ten() {
        let sampler = EmotionSampler::new();
        // count=1, label=happy, base=8, boost=5
        let mut src = ScriptedSource::new().indices([0, HAPPY]).ints([8, 5]);

        let readings = sampler.sample(&mut src).unwrap();
        assert_eq!(readings, vec![EmotionReading::new(EmotionLabel::Happy, 10)]);
    }

    #[test]
    fn test_duplicates_collapse_without_redraw() {
        let sampler = EmotionSampler::new();
        // count=3, labels neutral, neutral, surprised
        let mut src = ScriptedSource::new()
            .indices([2, NEUTRAL, NEUTRAL, SURPRISED])
            .ints([2, 1, 7]);

        let readings = sampler.sample(&mut src).unwrap();
        assert_eq!(
            readings,
            vec![
                EmotionReading::new(EmotionLabel::Neutral, 3),
                EmotionReading::new(EmotionLabel::Surprised, 7),
            ]
        );
        assert!(src.is_exhausted());
    }

    #[test]
    fn test_failure_yields_fallback() {
        let sampler = EmotionSampler::new();
        let mut src = ScriptedSource::new().indices([0]);

        let readings = sampler.sample_or_fallback(&mut src);
        assert_eq!(readings, vec![EmotionReading::fallback()]);
    }

    #[test]
    fn test_random_draws_hold_invariants() {
        let sampler = EmotionSampler::new();
        let mut src = RngSource::seeded(2024);

        for _ in 0..2000 {
            let readings = sampler.sample_or_fallback(&mut src);
            assert!((1..=3).contains(&readings.len()));

            let unique: HashSet<_> = readings.iter().map(|r| r.label).collect();
            assert_eq!(unique.len(), readings.len());

            for r in &readings {
                assert!((1..=10).contains(&r.value), "value {} out of range", r.value);
            }
        }
    }

    #[test]
    fn test_low_weight_labels_still_appear() {
        let sampler = EmotionSampler::new();
        let mut src = RngSource::seeded(99);
        let mut seen_angry = false;

        for _ in 0..3000 {
            for r in sampler.sample(&mut src).unwrap() {
                if r.label == EmotionLabel::Angry {
                    seen_angry = true;
                }
            }
        }
        assert!(seen_angry, "low-weight labels should still appear");
    }
}
