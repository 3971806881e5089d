//! Catalog collaborator: the relational store that owns session content.
//!
//! The engine is read-only with respect to session content. The single
//! write-back is the vector backup field, used as a fallback search path when
//! the vector service is unavailable.

pub mod error;
pub mod model;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::CatalogError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCatalogStore;
pub use model::Session;

use chrono::{DateTime, Utc};

/// Minimal async interface over the catalog store.
pub trait CatalogStore: Send + Sync {
    /// Bulk-reads every session.
    fn fetch_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Session>, CatalogError>> + Send;

    /// Reads sessions whose `last_updated` is at or after `cutoff`.
    fn fetch_updated_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Vec<Session>, CatalogError>> + Send;

    /// Persists the raw vector and its generation time into the session row.
    fn write_vector_backup(
        &self,
        entity_id: &str,
        vector: &[f32],
        last_updated: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), CatalogError>> + Send;
}
