use serde::{Deserialize, Serialize};

/// Closed interval `[min, max]` over the wear domain.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

impl FloatRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both ends finite and ordered.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// True iff the two closed intervals share at least one value.
    /// Touching endpoints count as overlap.
    pub fn is_overlapped(&self, other: &FloatRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Overlapping part of two ranges, if any.
    pub fn intersection(&self, other: &FloatRange) -> Option<FloatRange> {
        if !self.is_overlapped(other) {
            return None;
        }
        Some(FloatRange::new(
            self.min.max(other.min),
            self.max.min(other.max),
        ))
    }
}

impl std::fmt::Display for FloatRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.min, self.max)
    }
}
