use serde::{Deserialize, Serialize};

use crate::constants::{QUALITY_HIGH_THRESHOLD, QUALITY_MEDIUM_THRESHOLD};

/// Observability bucket for a generated vector's quality score.
///
/// Buckets are informational: low-quality vectors are still stored, the bucket
/// only feeds the run metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityBucket {
    /// Score above 0.9.
    High,
    /// Score in [0.5, 0.9].
    Medium,
    /// Everything below.
    Low,
}

impl QualityBucket {
    /// Buckets a score.
    pub fn from_score(score: f32) -> Self {
        if score > QUALITY_HIGH_THRESHOLD {
            QualityBucket::High
        } else if score >= QUALITY_MEDIUM_THRESHOLD {
            QualityBucket::Medium
        } else {
            QualityBucket::Low
        }
    }
}
