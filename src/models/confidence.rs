use std::fmt;

/// Coarse classification of a confidence score returned by the service.
///
/// Scores above 0.8 are `High`, above 0.6 are `Medium`, anything else is `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    const HIGH_THRESHOLD: f64 = 0.8;
    const MEDIUM_THRESHOLD: f64 = 0.6;

    /// Classifies a score. Both thresholds are exclusive and NaN is `Low`.
    ///
    /// # Examples
    ///
    /// ```
    /// use textlens::ConfidenceTier;
    ///
    /// assert_eq!(ConfidenceTier::from_score(0.95), ConfidenceTier::High);
    /// assert_eq!(ConfidenceTier::from_score(0.8), ConfidenceTier::Medium);
    /// assert_eq!(ConfidenceTier::from_score(0.6), ConfidenceTier::Low);
    /// ```
    pub fn from_score(score: f64) -> Self {
        if score > Self::HIGH_THRESHOLD {
            Self::High
        } else if score > Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
