use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::future::join_all;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

use super::error::SyncError;
use super::metrics::{ErrorRecord, ProcessingMetrics, ValidationIssue, ValidationReport};
use super::options::{NamespaceSelection, SyncOptions};
use crate::cache::{CacheValidity, CachedEmbedding, EmbeddingMetadata, EmbeddingRecord, FallbackCache};
use crate::catalog::{CatalogStore, Session};
use crate::config::Config;
use crate::constants::{cache_key, EMBEDDING_VERSION, MIN_TEXT_QUALITY};
use crate::embedder::{EmbeddingClient, RetryPolicy, RetryingClient};
use crate::hashing::checksum_text;
use crate::quality::{score_text, score_vector, QualityBucket};
use crate::vectordb::VectorDbClient;
use crate::writer::{is_dining_related, VectorStoreWriter};

/// Outcome of one entity's trip through the pipeline.
enum EntityOutcome {
    Processed { bucket: QualityBucket },
    Cached,
    Skipped,
    Failed { message: String, permanent: bool },
}

/// RAII membership in the in-flight set.
///
/// Removal happens on drop, so an error anywhere in the pipeline can never
/// leave an entity permanently marked in-flight.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    entity_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.entity_id);
    }
}

/// The embedding synchronization engine.
///
/// Owns the per-entity pipeline (cache check, quality gate, generation,
/// namespace writes, durable backup) and the batch scheduler driving it.
/// Collaborators are injected; construct one engine per composition root.
pub struct SyncEngine<C, E, V> {
    catalog: C,
    embedder: RetryingClient<E>,
    cache: FallbackCache,
    writer: VectorStoreWriter<V>,
    config: Config,
    metrics: RwLock<ProcessingMetrics>,
    errors: Mutex<HashMap<String, ErrorRecord>>,
    in_flight: Mutex<HashSet<String>>,
    run_lock: tokio::sync::Mutex<()>,
}

impl<C, E, V> SyncEngine<C, E, V>
where
    C: CatalogStore,
    E: EmbeddingClient,
    V: VectorDbClient,
{
    /// Wires the engine from its collaborators.
    pub fn new(
        catalog: C,
        embedder: E,
        cache: FallbackCache,
        vector_client: V,
        config: Config,
    ) -> Self {
        let policy = RetryPolicy::from_config(&config);
        let writer = VectorStoreWriter::new(vector_client, config.embedding_dim);
        Self {
            catalog,
            embedder: RetryingClient::new(embedder, policy),
            cache,
            writer,
            config,
            metrics: RwLock::new(ProcessingMetrics::default()),
            errors: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the catalog collaborator.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Returns the retry-wrapped embedding client.
    pub fn embedder(&self) -> &RetryingClient<E> {
        &self.embedder
    }

    /// Returns the cache layer.
    pub fn cache(&self) -> &FallbackCache {
        &self.cache
    }

    /// Returns the vector store writer.
    pub fn writer(&self) -> &VectorStoreWriter<V> {
        &self.writer
    }

    /// Snapshot of the most recent full run's metrics.
    pub fn metrics(&self) -> ProcessingMetrics {
        self.metrics.read().clone()
    }

    /// Snapshot of the accumulated error log.
    pub fn errors(&self) -> HashMap<String, ErrorRecord> {
        self.errors.lock().clone()
    }

    /// Clears the accumulated error log.
    pub fn clear_errors(&self) {
        self.errors.lock().clear();
    }

    /// Clears both cache backends.
    pub async fn clear_caches(&self) {
        self.cache.clear().await;
        info!("Embedding caches cleared");
    }

    /// Runs a full synchronization over every catalog entity.
    ///
    /// Overlapping calls queue on the run-lock rather than racing. A failed
    /// pre-flight check rejects the call before any entity is touched; a
    /// permanent service error mid-run halts further batches and surfaces as
    /// [`SyncError::Permanent`] with partial metrics still queryable via
    /// [`Self::metrics`].
    #[instrument(skip(self), fields(force_refresh = options.force_refresh))]
    pub async fn run_full_sync(
        &self,
        options: SyncOptions,
    ) -> Result<ProcessingMetrics, SyncError> {
        let _run = self.run_lock.lock().await;

        self.preflight().await?;
        self.writer.ensure_namespaces().await?;

        let sessions = self.catalog.fetch_all().await?;
        info!(total = sessions.len(), "Starting full sync");

        *self.metrics.write() = ProcessingMetrics::default();

        let (metrics, permanent) = self.run_batches(&sessions, &options).await;
        *self.metrics.write() = metrics.clone();

        if let Some(message) = permanent {
            error!(message, "Full sync aborted on permanent service error");
            return Err(SyncError::Permanent { message });
        }

        info!(
            processed = metrics.processed,
            cached = metrics.cached,
            skipped = metrics.skipped,
            failed = metrics.failed,
            total_time_ms = metrics.total_time_ms,
            "Full sync complete"
        );
        Ok(metrics)
    }

    /// Runs the pipeline over an explicit set of sessions.
    ///
    /// Used by the auto-sync daemon for narrow reprocessing; does not take the
    /// run-lock (the in-flight set still prevents duplicate generation when a
    /// full sync is running concurrently) and does not overwrite the stored
    /// full-run metrics.
    pub async fn sync_sessions(
        &self,
        sessions: &[Session],
        options: SyncOptions,
    ) -> ProcessingMetrics {
        if let Err(e) = self.writer.ensure_namespaces().await {
            warn!(error = %e, "Namespace provisioning failed before scoped sync");
        }

        let (metrics, permanent) = self.run_batches(sessions, &options).await;
        if let Some(message) = permanent {
            error!(message, "Scoped sync aborted on permanent service error");
        }
        metrics
    }

    /// Reapplies the cache validity check to every entity without regenerating.
    pub async fn validate_all_embeddings(&self) -> Result<ValidationReport, SyncError> {
        let sessions = self.catalog.fetch_all().await?;
        let mut report = ValidationReport::default();
        let now = Utc::now();

        for session in &sessions {
            let key = cache_key(&session.id);
            let checksum = checksum_text(&session.embedding_text());

            match self.cache.get(&key).await {
                None => {
                    report.missing += 1;
                    report.issues.push(ValidationIssue {
                        entity_id: session.id.clone(),
                        reason: "no cache entry".to_string(),
                    });
                }
                Some(entry) => {
                    let validity = entry.record.metadata.validity(
                        &checksum,
                        session.last_updated,
                        now,
                        self.config.refresh_interval,
                    );
                    if validity.is_valid() {
                        report.valid += 1;
                    } else {
                        report.invalid += 1;
                        report.issues.push(ValidationIssue {
                            entity_id: session.id.clone(),
                            reason: validity_reason(validity).to_string(),
                        });
                    }
                }
            }
        }

        debug!(
            valid = report.valid,
            invalid = report.invalid,
            missing = report.missing,
            "Validation sweep complete"
        );
        Ok(report)
    }

    /// Runs a validation sweep only if no full sync holds the run-lock.
    pub async fn validate_if_idle(&self) -> Option<Result<ValidationReport, SyncError>> {
        match self.run_lock.try_lock() {
            Ok(_guard) => Some(self.validate_all_embeddings().await),
            Err(_) => {
                debug!("Skipping validation sweep, full sync in progress");
                None
            }
        }
    }

    async fn preflight(&self) -> Result<(), SyncError> {
        self.embedder
            .health_check()
            .await
            .map_err(|e| SyncError::Preflight {
                service: "embedding service",
                message: e.to_string(),
            })?;

        self.writer
            .client()
            .health_check()
            .await
            .map_err(|e| SyncError::Preflight {
                service: "vector store",
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Drives batches strictly sequentially; entities within a batch run
    /// concurrently. Returns the aggregated metrics and, when a permanent
    /// service error halted the run, its message.
    async fn run_batches(
        &self,
        sessions: &[Session],
        options: &SyncOptions,
    ) -> (ProcessingMetrics, Option<String>) {
        let run_started = Instant::now();
        let batch_size = options.batch_size.unwrap_or(self.config.batch_size).max(1);

        let mut metrics = ProcessingMetrics {
            total: sessions.len(),
            ..Default::default()
        };
        let mut elapsed_sum = Duration::ZERO;
        let mut attempted = 0usize;
        let mut permanent: Option<String> = None;

        for (index, batch) in sessions.chunks(batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.batch_delay).await;
            }

            debug!(batch = index + 1, size = batch.len(), "Processing batch");
            let outcomes =
                join_all(batch.iter().map(|s| self.process_session(s, options))).await;

            for (outcome, elapsed) in outcomes {
                attempted += 1;
                elapsed_sum += elapsed;
                match outcome {
                    EntityOutcome::Processed { bucket } => {
                        metrics.processed += 1;
                        metrics.quality.record(bucket);
                    }
                    EntityOutcome::Cached => metrics.cached += 1,
                    EntityOutcome::Skipped => metrics.skipped += 1,
                    EntityOutcome::Failed {
                        message,
                        permanent: is_permanent,
                    } => {
                        metrics.failed += 1;
                        // First permanent failure wins; later ones are the same
                        // systemic condition.
                        if is_permanent && permanent.is_none() {
                            permanent = Some(message);
                        }
                    }
                }
            }

            // Only permanent failures halt scheduling.
            if permanent.is_some() {
                break;
            }
        }

        metrics.total_time_ms = run_started.elapsed().as_millis() as u64;
        if attempted > 0 {
            metrics.avg_processing_time_ms = elapsed_sum.as_millis() as f64 / attempted as f64;
        }
        if metrics.total > 0 {
            metrics.cache_hit_rate = metrics.cached as f32 / metrics.total as f32;
        }

        (metrics, permanent)
    }

    /// One entity's trip through the pipeline. Never panics and never returns
    /// an error: every failure is folded into the outcome.
    #[instrument(skip(self, session, options), fields(entity_id = %session.id))]
    async fn process_session(
        &self,
        session: &Session,
        options: &SyncOptions,
    ) -> (EntityOutcome, Duration) {
        let started = Instant::now();
        let outcome = self.process_session_inner(session, options).await;
        (outcome, started.elapsed())
    }

    async fn process_session_inner(
        &self,
        session: &Session,
        options: &SyncOptions,
    ) -> EntityOutcome {
        let Some(_guard) = self.try_begin(&session.id) else {
            debug!(entity_id = %session.id, "Already in flight, deduplicating");
            return EntityOutcome::Skipped;
        };

        let text = session.embedding_text();
        let checksum = checksum_text(&text);
        let key = cache_key(&session.id);

        if !options.force_refresh {
            if let Some(entry) = self.cache.get(&key).await {
                let validity = entry.record.metadata.validity(
                    &checksum,
                    session.last_updated,
                    Utc::now(),
                    self.config.refresh_interval,
                );
                if validity.is_valid() {
                    debug!(entity_id = %session.id, "Cache hit, skipping regeneration");
                    return EntityOutcome::Cached;
                }
                debug!(
                    entity_id = %session.id,
                    reason = validity_reason(validity),
                    "Cache entry invalid, regenerating"
                );
            }
        }

        let text_score = score_text(&text);
        if options.include_quality_check && text_score < MIN_TEXT_QUALITY {
            info!(
                entity_id = %session.id,
                score = text_score,
                "Text below quality gate, skipping"
            );
            return EntityOutcome::Skipped;
        }

        let vector = match self.embedder.generate(&text).await {
            Ok(vector) => vector,
            Err(e) => {
                let permanent = e.is_permanent();
                self.record_error(&session.id, &e.to_string());
                warn!(entity_id = %session.id, error = %e, "Embedding generation failed");
                return EntityOutcome::Failed {
                    message: e.to_string(),
                    permanent,
                };
            }
        };

        // Dimension mismatches must never reach a store.
        if vector.len() != self.config.embedding_dim {
            let message = format!(
                "embedding dimension mismatch: expected {}, got {}",
                self.config.embedding_dim,
                vector.len()
            );
            self.record_error(&session.id, &message);
            error!(entity_id = %session.id, message, "Rejecting malformed vector");
            return EntityOutcome::Failed {
                message,
                permanent: true,
            };
        }

        let bucket = QualityBucket::from_score(score_vector(&vector));

        let record = EmbeddingRecord {
            entity_id: session.id.clone(),
            vector: vector.clone(),
            metadata: EmbeddingMetadata {
                version: EMBEDDING_VERSION,
                quality_score: text_score,
                text_length: text.chars().count(),
                generated_at: Utc::now(),
                model_id: self.embedder.model_id().to_string(),
                dimensions: vector.len(),
                checksum,
            },
        };

        if let Err(e) = self.writer.upsert_primary(session, vector.clone()).await {
            self.record_error(&session.id, &e.to_string());
            warn!(entity_id = %session.id, error = %e, "Vector store upsert failed");
            return EntityOutcome::Failed {
                message: e.to_string(),
                permanent: false,
            };
        }

        // Cache only after the store write succeeds: a cache entry with no
        // backing point would make the next run skip the missing upsert.
        self.cache.set(&key, &CachedEmbedding::new(record)).await;

        if options.namespaces == NamespaceSelection::Both && is_dining_related(session) {
            self.upsert_dining(session).await;
        }

        // Durable backup is best-effort: the vector store write already
        // succeeded, so a failure here must not fail the entity.
        if let Err(e) = self
            .catalog
            .write_vector_backup(&session.id, &vector, session.last_updated)
            .await
        {
            warn!(entity_id = %session.id, error = %e, "Vector backup write failed");
        }

        EntityOutcome::Processed { bucket }
    }

    /// Generates and upserts the dining-namespace vector, best-effort.
    async fn upsert_dining(&self, session: &Session) {
        let dining_vector = match self.embedder.generate(&session.dining_text()).await {
            Ok(vector) if vector.len() == self.config.embedding_dim => vector,
            Ok(vector) => {
                warn!(
                    entity_id = %session.id,
                    expected = self.config.embedding_dim,
                    actual = vector.len(),
                    "Dining vector has wrong dimension, dropping"
                );
                return;
            }
            Err(e) => {
                warn!(entity_id = %session.id, error = %e, "Dining embedding failed");
                return;
            }
        };

        if let Err(e) = self.writer.upsert_secondary(session, dining_vector).await {
            warn!(entity_id = %session.id, error = %e, "Dining namespace upsert failed");
        }
    }

    /// Check-and-insert into the in-flight set; `None` means another task owns
    /// this entity right now.
    fn try_begin(&self, entity_id: &str) -> Option<InFlightGuard<'_>> {
        let mut in_flight = self.in_flight.lock();
        if !in_flight.insert(entity_id.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            set: &self.in_flight,
            entity_id: entity_id.to_string(),
        })
    }

    fn record_error(&self, entity_id: &str, message: &str) {
        let mut errors = self.errors.lock();
        errors
            .entry(entity_id.to_string())
            .and_modify(|record| {
                record.count += 1;
                record.last_error = message.to_string();
            })
            .or_insert_with(|| ErrorRecord {
                entity_id: entity_id.to_string(),
                count: 1,
                last_error: message.to_string(),
            });
    }
}

fn validity_reason(validity: CacheValidity) -> &'static str {
    match validity {
        CacheValidity::Valid => "valid",
        CacheValidity::ChecksumMismatch => "checksum mismatch",
        CacheValidity::Stale => "entity updated after generation",
        CacheValidity::Expired => "past refresh interval",
    }
}
