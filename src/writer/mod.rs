//! Dual-namespace vector store writer.
//!
//! Every processed session is upserted into the primary namespace. A keyword
//! classifier additionally routes dining-related sessions (meals, receptions,
//! coffee breaks) into a secondary namespace embedded from a narrower text
//! composition, so meal lookups don't compete with talk content.


use tracing::debug;

use crate::catalog::Session;
use crate::constants::{PRIMARY_NAMESPACE, SECONDARY_NAMESPACE};
use crate::vectordb::{SessionPoint, VectorDbClient, VectorDbError};

/// Keywords that route a session into the dining namespace.
const DINING_KEYWORDS: &[&str] = &[
    "breakfast",
    "lunch",
    "dinner",
    "snack",
    "coffee",
    "reception",
    "buffet",
    "meal",
    "food",
    "catering",
];

/// Returns `true` if the session belongs in the dining namespace.
///
/// Keyword presence over title and description only; tags are curated by track
/// owners and too noisy for this decision.
pub fn is_dining_related(session: &Session) -> bool {
    let haystack = format!("{} {}", session.title, session.description).to_lowercase();
    DINING_KEYWORDS.iter().any(|kw| haystack.contains(kw))
}

/// Writes session vectors into the configured namespaces.
pub struct VectorStoreWriter<V> {
    client: V,
    dimensions: usize,
}

impl<V: VectorDbClient> VectorStoreWriter<V> {
    /// Wraps a vector database client.
    pub fn new(client: V, dimensions: usize) -> Self {
        Self { client, dimensions }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &V {
        &self.client
    }

    /// Creates both namespaces if missing.
    pub async fn ensure_namespaces(&self) -> Result<(), VectorDbError> {
        self.client
            .ensure_collection(PRIMARY_NAMESPACE, self.dimensions as u64)
            .await?;
        self.client
            .ensure_collection(SECONDARY_NAMESPACE, self.dimensions as u64)
            .await?;
        Ok(())
    }

    /// Upserts the session's primary embedding.
    pub async fn upsert_primary(
        &self,
        session: &Session,
        vector: Vec<f32>,
    ) -> Result<(), VectorDbError> {
        let point = SessionPoint::new(session, vector);
        debug!(entity_id = %session.id, namespace = PRIMARY_NAMESPACE, "Upserting vector");
        self.client
            .upsert_points(PRIMARY_NAMESPACE, vec![point])
            .await
    }

    /// Upserts the session's dining embedding.
    pub async fn upsert_secondary(
        &self,
        session: &Session,
        vector: Vec<f32>,
    ) -> Result<(), VectorDbError> {
        let point = SessionPoint::new(session, vector);
        debug!(entity_id = %session.id, namespace = SECONDARY_NAMESPACE, "Upserting vector");
        self.client
            .upsert_points(SECONDARY_NAMESPACE, vec![point])
            .await
    }
}
