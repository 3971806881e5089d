//! BLAKE3 hashing for content checksums and vector-store point ids.
//!
//! Checksums are computed over *canonicalized* text so that formatting-only
//! edits (whitespace, casing) do not force a regeneration, while any real
//! content drift invalidates the cached record even when the catalog's
//! `last_updated` column was not bumped.

/// Canonicalizes text for checksumming: trim, collapse internal whitespace,
/// lowercase.
pub fn canonicalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Returns the hex-encoded BLAKE3 checksum of the canonicalized text.
pub fn checksum_text(text: &str) -> String {
    blake3::hash(canonicalize(text).as_bytes())
        .to_hex()
        .to_string()
}

/// Derives a stable u64 point id for an entity id.
///
/// Qdrant point ids are numeric; hashing the catalog's string id gives an
/// idempotent mapping so repeated upserts overwrite the same point.
pub fn point_id(entity_id: &str) -> u64 {
    let hash = blake3::hash(entity_id.as_bytes());
    let bytes = hash.as_bytes();
    u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_stable() {
        assert_eq!(checksum_text("Rust at scale"), checksum_text("Rust at scale"));
    }

    #[test]
    fn test_checksum_ignores_formatting() {
        assert_eq!(
            checksum_text("  Rust\tat   scale "),
            checksum_text("rust at scale")
        );
    }

    #[test]
    fn test_checksum_detects_content_drift() {
        assert_ne!(checksum_text("Rust at scale"), checksum_text("Rust at speed"));
    }

    #[test]
    fn test_point_id_stable_and_distinct() {
        assert_eq!(point_id("sess-1"), point_id("sess-1"));
        assert_ne!(point_id("sess-1"), point_id("sess-2"));
    }
}
