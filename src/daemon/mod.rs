//! Background auto-sync daemon.
//!
//! Periodically reprocesses catalog entities that changed since the last
//! tick, runs a validation sweep when no full sync is active, and triggers a
//! self-healing full resync when cache drift crosses the configured
//! threshold.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::CatalogStore;
use crate::embedder::EmbeddingClient;
use crate::sync::{SyncEngine, SyncOptions};
use crate::vectordb::VectorDbClient;

#[cfg(test)]
mod tests;

/// Periodic incremental sync driver wrapping a shared [`SyncEngine`].
pub struct AutoSyncDaemon<C, E, V> {
    engine: Arc<SyncEngine<C, E, V>>,
    running: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<C, E, V> AutoSyncDaemon<C, E, V>
where
    C: CatalogStore + 'static,
    E: EmbeddingClient + 'static,
    V: VectorDbClient + 'static,
{
    /// Creates a stopped daemon around `engine`.
    pub fn new(engine: Arc<SyncEngine<C, E, V>>) -> Self {
        Self {
            engine,
            running: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }

    /// Returns `true` while the background task is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Returns the shared engine.
    pub fn engine(&self) -> &Arc<SyncEngine<C, E, V>> {
        &self.engine
    }

    /// Starts the background loop ticking every `interval`. Idempotent: a
    /// second call while running is a no-op (the original interval stays in
    /// effect until the daemon is stopped and restarted).
    ///
    /// The first tick fires one full interval after start, not immediately.
    pub fn start(&self, interval: Duration) {
        if self.running.swap(true, Ordering::AcqRel) {
            debug!("Auto-sync daemon already running");
            return;
        }

        let engine = Arc::clone(&self.engine);
        let running = Arc::clone(&self.running);

        info!(period_ms = interval.as_millis() as u64, "Starting auto-sync daemon");
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if !running.load(Ordering::Acquire) {
                    break;
                }
                Self::tick(&engine, interval).await;
            }
        });

        *self.handle.lock() = Some(handle);
    }

    /// Stops the background loop. Idempotent.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }

        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
        info!("Auto-sync daemon stopped");
    }

    /// One daemon pass: incremental reprocess over the tick window, then a
    /// drift check.
    async fn tick(engine: &SyncEngine<C, E, V>, window: Duration) {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::hours(1));

        let updated = match engine.catalog().fetch_updated_since(cutoff).await {
            Ok(updated) => updated,
            Err(e) => {
                warn!(error = %e, "Auto-sync tick could not read the catalog");
                return;
            }
        };

        if !updated.is_empty() {
            info!(count = updated.len(), "Reprocessing recently updated entities");
            // One-at-a-time batches keep the daemon's footprint small next to
            // interactive full syncs.
            let options = SyncOptions::forced().with_batch_size(1);
            let metrics = engine.sync_sessions(&updated, options).await;
            debug!(
                processed = metrics.processed,
                failed = metrics.failed,
                "Incremental sync pass complete"
            );
        }

        match engine.validate_if_idle().await {
            Some(Ok(report)) => {
                let drift = report.drift();
                if drift > engine.config().heal_threshold {
                    warn!(
                        drift,
                        threshold = engine.config().heal_threshold,
                        "Cache drift over threshold, running self-healing full sync"
                    );
                    if let Err(e) = engine.run_full_sync(SyncOptions::default()).await {
                        warn!(error = %e, "Self-healing full sync failed");
                    }
                } else if drift > 0 {
                    debug!(drift, "Cache drift under threshold, leaving as-is");
                }
            }
            Some(Err(e)) => warn!(error = %e, "Validation sweep failed"),
            None => {}
        }
    }
}

impl<C, E, V> Drop for AutoSyncDaemon<C, E, V> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }
}
