use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::AutoSyncDaemon;
use crate::cache::{FallbackCache, LocalCacheBackend};
use crate::catalog::{MockCatalogStore, Session};
use crate::config::Config;
use crate::constants::{cache_key, PRIMARY_NAMESPACE};
use crate::embedder::MockEmbeddingClient;
use crate::sync::SyncEngine;
use crate::vectordb::MockVectorDbClient;

const DIM: usize = 16;
const TICK: Duration = Duration::from_millis(20);

fn daemon_with(
    sessions: Vec<Session>,
    config: Config,
) -> AutoSyncDaemon<MockCatalogStore, MockEmbeddingClient, MockVectorDbClient> {
    let cache = FallbackCache::new(Arc::new(LocalCacheBackend::new(config.cache_ttl)));
    let engine = SyncEngine::new(
        MockCatalogStore::with_sessions(sessions),
        MockEmbeddingClient::new(DIM),
        cache,
        MockVectorDbClient::new(),
        config,
    );
    AutoSyncDaemon::new(Arc::new(engine))
}

fn fast_config() -> Config {
    Config {
        embedding_dim: DIM,
        batch_delay: Duration::from_millis(1),
        retry_delay: Duration::from_millis(1),
        heal_threshold: 10,
        ..Config::default()
    }
}

fn fresh_session(id: &str) -> Session {
    let mut session = MockCatalogStore::sample_session(
        id,
        "Observability for Async Runtimes",
        "Tracing, metrics, and the instrumentation patterns that make async \
         services debuggable in production. Includes a live demo of task \
         dumps and waker diagnostics.",
    );
    session.last_updated = Utc::now();
    session
}

#[tokio::test]
async fn start_and_stop_are_idempotent() {
    let daemon = daemon_with(vec![], fast_config());

    assert!(!daemon.is_running());
    daemon.start(TICK);
    daemon.start(TICK);
    assert!(daemon.is_running());

    daemon.stop();
    daemon.stop();
    assert!(!daemon.is_running());
}

#[tokio::test]
async fn tick_reprocesses_recently_updated_sessions() {
    let daemon = daemon_with(vec![fresh_session("s0")], fast_config());
    daemon.start(TICK);

    // Edit the session mid-run so its timestamp lands squarely inside a
    // later tick's window.
    tokio::time::sleep(Duration::from_millis(30)).await;
    daemon
        .engine()
        .catalog()
        .update_description("s0", "Expanded abstract after the CFP review round.");
    tokio::time::sleep(Duration::from_millis(70)).await;
    daemon.stop();

    let engine = daemon.engine();
    assert_eq!(
        engine
            .writer()
            .client()
            .point_count(PRIMARY_NAMESPACE)
            .unwrap(),
        1
    );
    assert!(engine.cache().get(&cache_key("s0")).await.is_some());
}

#[tokio::test]
async fn first_tick_waits_one_full_interval() {
    let daemon = daemon_with(vec![fresh_session("s0")], fast_config());

    daemon.start(Duration::from_secs(60));
    tokio::time::sleep(Duration::from_millis(50)).await;
    daemon.stop();

    // The first tick is still pending; nothing was generated or written.
    assert_eq!(daemon.engine().embedder().inner().call_count(), 0);
    assert!(daemon
        .engine()
        .writer()
        .client()
        .point_count(PRIMARY_NAMESPACE)
        .is_none());
}

#[tokio::test]
async fn interval_comes_from_the_caller_not_the_config() {
    // Same config, two cadences: the fast daemon does a round of work while
    // the slow one never reaches its first tick.
    let fast = daemon_with(vec![fresh_session("s0")], fast_config());
    let slow = daemon_with(vec![fresh_session("s0")], fast_config());

    fast.start(TICK);
    slow.start(Duration::from_secs(60));

    tokio::time::sleep(Duration::from_millis(30)).await;
    fast.engine()
        .catalog()
        .update_description("s0", "Expanded abstract after the CFP review round.");
    slow.engine()
        .catalog()
        .update_description("s0", "Expanded abstract after the CFP review round.");
    tokio::time::sleep(Duration::from_millis(70)).await;
    fast.stop();
    slow.stop();

    assert_eq!(
        fast.engine()
            .writer()
            .client()
            .point_count(PRIMARY_NAMESPACE)
            .unwrap(),
        1
    );
    assert_eq!(slow.engine().embedder().inner().call_count(), 0);
}

#[tokio::test]
async fn drift_over_threshold_triggers_a_full_resync() {
    // Session last touched well before the tick window, so the incremental
    // pass ignores it; only the drift check can bring it in.
    let mut stale = fresh_session("s0");
    stale.last_updated = Utc::now() - chrono::Duration::hours(6);

    let config = Config {
        heal_threshold: 0,
        ..fast_config()
    };
    let daemon = daemon_with(vec![stale], config);

    daemon.start(TICK);
    tokio::time::sleep(Duration::from_millis(100)).await;
    daemon.stop();

    let engine = daemon.engine();
    assert_eq!(
        engine
            .writer()
            .client()
            .point_count(PRIMARY_NAMESPACE)
            .unwrap(),
        1
    );
    assert!(engine.cache().get(&cache_key("s0")).await.is_some());
}

#[tokio::test]
async fn drift_under_threshold_leaves_the_store_alone() {
    let mut stale = fresh_session("s0");
    stale.last_updated = Utc::now() - chrono::Duration::hours(6);

    let daemon = daemon_with(vec![stale], fast_config());

    daemon.start(TICK);
    tokio::time::sleep(Duration::from_millis(60)).await;
    daemon.stop();

    // Drift of 1 is under the threshold of 10, so nothing was regenerated.
    assert_eq!(daemon.engine().embedder().inner().call_count(), 0);
}

#[tokio::test]
async fn restart_after_stop_resumes_ticking() {
    let daemon = daemon_with(vec![], fast_config());

    daemon.start(TICK);
    daemon.stop();
    daemon.start(TICK);
    assert!(daemon.is_running());

    tokio::time::sleep(Duration::from_millis(30)).await;
    daemon.engine().catalog().insert(fresh_session("s0"));
    tokio::time::sleep(Duration::from_millis(70)).await;
    daemon.stop();

    assert_eq!(
        daemon
            .engine()
            .writer()
            .client()
            .point_count(PRIMARY_NAMESPACE)
            .unwrap(),
        1
    );
}
