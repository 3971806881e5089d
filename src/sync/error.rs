use thiserror::Error;

use crate::catalog::CatalogError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Top-level errors from sync runs.
///
/// Entity-level failures never surface here — they are folded into the run
/// metrics and the error log. Only systemic conditions reject a run.
pub enum SyncError {
    /// A pre-flight availability check failed; no entity was touched.
    #[error("pre-flight check failed for {service}: {message}")]
    Preflight {
        /// Which collaborator was unreachable.
        service: &'static str,
        /// Error message.
        message: String,
    },

    /// The catalog bulk read failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Namespace creation failed before processing started.
    #[error("vector namespace setup failed: {0}")]
    Namespace(#[from] VectorDbError),

    /// A permanent service error (auth, dimension mismatch) halted the run.
    /// Metrics up to the abort remain queryable.
    #[error("run aborted on permanent service error: {message}")]
    Permanent {
        /// Error message from the first permanent failure.
        message: String,
    },
}
