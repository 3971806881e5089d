use std::collections::HashMap;

use crate::catalog::Session;
use crate::hashing::point_id;

/// Max chars of the description carried in payloads.
const SNIPPET_CHARS: usize = 200;

/// Payload stored alongside each vector, carrying the fields the downstream
/// search consumer filters on.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPayload {
    /// Catalog entity id (string form; the numeric point id is derived).
    pub entity_id: String,
    /// Session title.
    pub title: String,
    /// Truncated description.
    pub snippet: String,
    /// Track name.
    pub track: String,
    /// Comma-joined tags.
    pub tags: String,
    /// Comma-joined speaker names.
    pub speakers: String,
    /// Start, unix seconds.
    pub starts_at: i64,
    /// End, unix seconds.
    pub ends_at: i64,
    /// Catalog `last_updated`, unix seconds.
    pub last_updated: i64,
}

impl SessionPayload {
    /// Builds the payload from a catalog session.
    pub fn from_session(session: &Session) -> Self {
        Self {
            entity_id: session.id.clone(),
            title: session.title.clone(),
            snippet: session.snippet(SNIPPET_CHARS),
            track: session.track.clone(),
            tags: session.tags.join(", "),
            speakers: session.speakers.join(", "),
            starts_at: session.starts_at.timestamp(),
            ends_at: session.ends_at.timestamp(),
            last_updated: session.last_updated.timestamp(),
        }
    }

    /// Converts into a Qdrant payload map.
    pub fn into_qdrant_payload(self) -> HashMap<String, qdrant_client::qdrant::Value> {
        let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
        payload.insert("entity_id".to_string(), self.entity_id.into());
        payload.insert("title".to_string(), self.title.into());
        payload.insert("snippet".to_string(), self.snippet.into());
        payload.insert("track".to_string(), self.track.into());
        payload.insert("tags".to_string(), self.tags.into());
        payload.insert("speakers".to_string(), self.speakers.into());
        payload.insert("starts_at".to_string(), self.starts_at.into());
        payload.insert("ends_at".to_string(), self.ends_at.into());
        payload.insert("last_updated".to_string(), self.last_updated.into());
        payload
    }
}

/// One point to upsert: derived id, vector, filterable payload.
#[derive(Debug, Clone)]
pub struct SessionPoint {
    /// Numeric point id derived from the entity id (idempotent upserts).
    pub id: u64,
    /// The embedding vector.
    pub vector: Vec<f32>,
    /// Filterable payload.
    pub payload: SessionPayload,
}

impl SessionPoint {
    /// Builds a point for `session` with `vector`.
    pub fn new(session: &Session, vector: Vec<f32>) -> Self {
        Self {
            id: point_id(&session.id),
            vector,
            payload: SessionPayload::from_session(session),
        }
    }
}
