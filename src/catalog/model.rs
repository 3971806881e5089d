use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A searchable catalog record: one conference session.
///
/// Owned by the catalog store; the engine reads sessions and writes back only
/// the vector-backup field via [`super::CatalogStore::write_vector_backup`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Catalog id, unique across the conference.
    pub id: String,
    /// Session title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Track name (e.g. "Systems", "Keynotes").
    pub track: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Speaker display names.
    pub speakers: Vec<String>,
    /// Scheduled start.
    pub starts_at: DateTime<Utc>,
    /// Scheduled end.
    pub ends_at: DateTime<Utc>,
    /// Last content mutation in the catalog.
    pub last_updated: DateTime<Utc>,
}

impl Session {
    /// Canonical text composition embedded into the primary namespace.
    ///
    /// Field order is part of the checksum contract: reordering changes every
    /// checksum and forces a full regeneration.
    pub fn embedding_text(&self) -> String {
        let mut parts = vec![
            format!("Title: {}", self.title),
            format!("Track: {}", self.track),
        ];

        if !self.speakers.is_empty() {
            parts.push(format!("Speakers: {}", self.speakers.join(", ")));
        }

        parts.push(format!(
            "Time: {} to {}",
            self.starts_at.format("%Y-%m-%d %H:%M"),
            self.ends_at.format("%H:%M")
        ));

        if !self.description.is_empty() {
            parts.push(format!("Description: {}", self.description));
        }

        if !self.tags.is_empty() {
            parts.push(format!("Tags: {}", self.tags.join(", ")));
        }

        parts.join("\n")
    }

    /// Domain-specific composition embedded into the dining namespace.
    ///
    /// Narrower than [`Self::embedding_text`]: meal lookups care about what is
    /// served and when, not about track or speaker lineup.
    pub fn dining_text(&self) -> String {
        format!(
            "{}\nServed: {} to {}\n{}",
            self.title,
            self.starts_at.format("%Y-%m-%d %H:%M"),
            self.ends_at.format("%H:%M"),
            self.description
        )
    }

    /// Short description snippet stored in vector payloads.
    pub fn snippet(&self, max_chars: usize) -> String {
        if self.description.chars().count() <= max_chars {
            return self.description.clone();
        }
        let truncated: String = self.description.chars().take(max_chars).collect();
        format!("{truncated}…")
    }
}
