//! Quality gate: scores candidate text before generation and the resulting
//! vector after.
//!
//! The text score is a hard gate — below [`crate::constants::MIN_TEXT_QUALITY`]
//! the entity is skipped and counted, never retried. The vector score is
//! informational and only feeds the quality histogram in the run metrics.

mod scorer;
mod types;


pub use scorer::{score_text, score_vector};
pub use types::QualityBucket;
