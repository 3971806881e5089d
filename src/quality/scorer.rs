use std::collections::HashSet;

use crate::constants::{MAX_TEXT_LEN, MIN_TEXT_LEN};

/// Keywords that mark conference-domain text.
const DOMAIN_KEYWORDS: &[&str] = &[
    "keynote", "workshop", "session", "panel", "talk", "track", "speaker", "demo",
];

/// Scores candidate text in `[0, 1]` before any embedding call is made.
///
/// Texts under [`MIN_TEXT_LEN`] characters score a flat 0.1, below the skip
/// gate: there is not enough signal to embed, and retrying will not help.
/// Everything else starts at 0.5 and earns rewards for word count, lexical
/// diversity and structural markers; oversized text is penalized instead of
/// rewarded for its length.
pub fn score_text(text: &str) -> f32 {
    let trimmed = text.trim();
    let char_count = trimmed.chars().count();
    if char_count < MIN_TEXT_LEN {
        return 0.1;
    }

    let mut score: f32 = 0.5;

    if char_count <= MAX_TEXT_LEN {
        score += 0.1;
    } else {
        score -= 0.3;
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() > 20 {
        score += 0.1;
    }
    if words.len() > 50 {
        score += 0.1;
    }

    if !words.is_empty() {
        let unique: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let diversity = unique.len() as f32 / words.len() as f32;
        if diversity > 0.5 {
            score += 0.1;
        }
    }

    let lower = trimmed.to_lowercase();
    if has_time_marker(trimmed) {
        score += 0.05;
    }
    if DOMAIN_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}

/// Scores a generated vector in `[0, 1]`.
///
/// Degenerate outputs (mostly zeros, implausible magnitude, flat components)
/// are penalized. The result is bucketed for metrics only; no vector is
/// rejected here.
pub fn score_vector(vector: &[f32]) -> f32 {
    if vector.is_empty() {
        return 0.0;
    }

    let mut score: f32 = 1.0;

    let zeros = vector.iter().filter(|&&v| v == 0.0).count();
    if zeros as f32 / vector.len() as f32 > 0.5 {
        score -= 0.5;
    }

    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if !(0.1..=100.0).contains(&norm) {
        score -= 0.3;
    }

    let mean = vector.iter().sum::<f32>() / vector.len() as f32;
    let variance =
        vector.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / vector.len() as f32;
    if variance < 1e-6 {
        score -= 0.4;
    }

    score.clamp(0.0, 1.0)
}

/// Detects `hh:mm`-shaped time markers without a regex dependency.
fn has_time_marker(text: &str) -> bool {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b':' {
            continue;
        }
        let digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
        let two_digits_after = i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_digit()
            && bytes[i + 2].is_ascii_digit();
        if digit_before && two_digits_after {
            return true;
        }
    }
    false
}
