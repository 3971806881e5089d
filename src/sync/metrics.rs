use serde::Serialize;

use crate::quality::QualityBucket;

/// Vector quality histogram for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QualityHistogram {
    /// Vectors scoring above 0.9.
    pub high: usize,
    /// Vectors scoring in [0.5, 0.9].
    pub medium: usize,
    /// Everything below.
    pub low: usize,
}

impl QualityHistogram {
    /// Records one bucketed vector.
    pub fn record(&mut self, bucket: QualityBucket) {
        match bucket {
            QualityBucket::High => self.high += 1,
            QualityBucket::Medium => self.medium += 1,
            QualityBucket::Low => self.low += 1,
        }
    }
}

/// Aggregate counters for one sync run. Reset at the start of each run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingMetrics {
    /// Entities considered.
    pub total: usize,
    /// Entities freshly embedded and written.
    pub processed: usize,
    /// Entities that failed after retries.
    pub failed: usize,
    /// Entities skipped (quality gate or in-flight dedup).
    pub skipped: usize,
    /// Entities served by a valid cache entry.
    pub cached: usize,
    /// Vector quality histogram.
    pub quality: QualityHistogram,
    /// Mean per-entity processing time in milliseconds.
    pub avg_processing_time_ms: f64,
    /// Wall-clock duration of the run in milliseconds.
    pub total_time_ms: u64,
    /// `cached / total`, 0 when the run was empty.
    pub cache_hit_rate: f32,
}

/// Per-entity failure tally, accumulated across runs until cleared.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Entity id.
    pub entity_id: String,
    /// Failures observed so far.
    pub count: u32,
    /// Most recent error message.
    pub last_error: String,
}

/// Result of a validation sweep over all entities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Entries that passed the validity check.
    pub valid: usize,
    /// Entries present but invalid (checksum/staleness/age).
    pub invalid: usize,
    /// Entities with no cache entry at all.
    pub missing: usize,
    /// One issue per invalid or missing entity.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Drift count that the self-heal threshold is compared against.
    pub fn drift(&self) -> usize {
        self.invalid + self.missing
    }
}

/// A single validation finding.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Entity id.
    pub entity_id: String,
    /// Human-readable reason.
    pub reason: String,
}
