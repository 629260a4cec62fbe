//! Emotion labels and readings

use serde::{Deserialize, Serialize};

/// The closed set of emotions the sampler can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
    Fearful,
    Disgusted,
}

impl EmotionLabel {
    /// All labels, in weight-table order
    pub const ALL: [EmotionLabel; 7] = [
        EmotionLabel::Neutral,
        EmotionLabel::Happy,
        EmotionLabel::Sad,
        EmotionLabel::Angry,
        EmotionLabel::Surprised,
        EmotionLabel::Fearful,
        EmotionLabel::Disgusted,
    ];

    /// Static relative likelihood
    pub fn likelihood(&self) -> u32 {
        match self {
            EmotionLabel::Neutral => 30,
            EmotionLabel::Happy => 20,
            EmotionLabel::Sad => 10,
            EmotionLabel::Angry => 5,
            EmotionLabel::Surprised => 15,
            EmotionLabel::Fearful => 5,
            EmotionLabel::Disgusted => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Angry => "angry",
            EmotionLabel::Surprised => "surprised",
            EmotionLabel::Fearful => "fearful",
            EmotionLabel::Disgusted => "disgusted",
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One detected emotion with a 1-10 confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionReading {
    pub label: EmotionLabel,
    pub value: u8,
}

impl EmotionReading {
    pub fn new(label: EmotionLabel, value: u8) -> Self {
        Self { label, value }
    }

    /// Neutral at the lowest confidence, used whenever sampling fails
    pub fn fallback() -> Self {
        Self::new(EmotionLabel::Neutral, crate::MIN_CONFIDENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_serialize_lowercase() {
        let json = serde_json::to_string(&EmotionReading::new(EmotionLabel::Surprised, 9)).unwrap();
        assert_eq!(json, r#"{"label":"surprised","value":9}"#);
    }

    #[test]
    fn test_only_neutral_and_happy_exceed_boost_threshold() {
        let boosted: Vec<_> = EmotionLabel::ALL
            .iter()
            .filter(|l| l.likelihood() > crate::BOOST_LIKELIHOOD_THRESHOLD)
            .collect();
        assert_eq!(boosted, vec![&EmotionLabel::Neutral, &EmotionLabel::Happy]);
    }
}
