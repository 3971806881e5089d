use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the catalog collaborator.
pub enum CatalogError {
    /// Bulk read failed.
    #[error("failed to fetch sessions: {message}")]
    FetchFailed {
        /// Error message.
        message: String,
    },

    /// Vector backup write failed.
    #[error("failed to write vector backup for '{entity_id}': {message}")]
    BackupFailed {
        /// Entity id.
        entity_id: String,
        /// Error message.
        message: String,
    },
}
