//! End-to-end pipeline tests against the public API, using the mock
//! collaborators shipped behind the `mock` feature.

use std::sync::Arc;
use std::time::Duration;

use confsync::{
    cache_key, point_id, CatalogStore, Config, FallbackCache, LocalCacheBackend, MockCatalogStore,
    MockEmbeddingClient, MockVectorDbClient, Session, SyncEngine, SyncOptions,
    EMBEDDING_VERSION, PRIMARY_NAMESPACE, SECONDARY_NAMESPACE,
};

const DIM: usize = 64;

fn config() -> Config {
    Config {
        embedding_dim: DIM,
        batch_size: 10,
        batch_delay: Duration::from_millis(1),
        retry_delay: Duration::from_millis(5),
        ..Config::default()
    }
}

fn engine(
    sessions: Vec<Session>,
) -> SyncEngine<MockCatalogStore, MockEmbeddingClient, MockVectorDbClient> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();

    let config = config();
    let cache = FallbackCache::new(Arc::new(LocalCacheBackend::new(config.cache_ttl)));
    SyncEngine::new(
        MockCatalogStore::with_sessions(sessions),
        MockEmbeddingClient::new(DIM),
        cache,
        MockVectorDbClient::new(),
        config,
    )
}

fn talk(id: &str, n: usize) -> Session {
    MockCatalogStore::sample_session(
        id,
        &format!("Incremental Computation, Part {n}"),
        "How to structure a build system around incremental recomputation. \
         This talk walks through dependency tracking, early cutoff, and the \
         subtle cache invalidation bugs we shipped along the way.",
    )
}

fn empty_talk(id: &str) -> Session {
    let mut session = MockCatalogStore::sample_session(id, "", "");
    session.track = String::new();
    session.tags.clear();
    session.speakers.clear();
    session
}

#[tokio::test]
async fn full_catalog_sync_end_to_end() {
    // 25 entities, batch size 10, one of them empty: three batches, one skip.
    let mut sessions: Vec<Session> = (0..24).map(|i| talk(&format!("s{i:02}"), i)).collect();
    sessions.push(empty_talk("s24"));
    let engine = engine(sessions);

    let metrics = engine.run_full_sync(SyncOptions::default()).await.unwrap();

    assert_eq!(metrics.total, 25);
    assert_eq!(metrics.processed, 24);
    assert_eq!(metrics.skipped, 1);
    assert_eq!(metrics.failed, 0);
    assert_eq!(metrics.quality.high, 24);

    // Every processed entity is in the store, the cache, and the backup.
    let store = engine.writer().client();
    assert_eq!(store.point_count(PRIMARY_NAMESPACE).unwrap(), 24);
    assert!(engine.cache().get(&cache_key("s00")).await.is_some());
    assert_eq!(engine.catalog().backup_count(), 24);

    // The empty entity reached none of them.
    assert!(!store.contains(PRIMARY_NAMESPACE, point_id("s24")));
    assert!(engine.cache().get(&cache_key("s24")).await.is_none());
}

#[tokio::test]
async fn cached_metadata_matches_the_generated_vector() {
    let session = talk("s0", 1);
    let engine = engine(vec![session.clone()]);

    engine.run_full_sync(SyncOptions::default()).await.unwrap();

    let entry = engine.cache().get(&cache_key("s0")).await.unwrap();
    let meta = &entry.record.metadata;
    assert_eq!(entry.record.entity_id, "s0");
    assert_eq!(entry.record.vector.len(), DIM);
    assert_eq!(meta.version, EMBEDDING_VERSION);
    assert_eq!(meta.dimensions, DIM);
    assert_eq!(meta.model_id, "mock-embedding");
    assert_eq!(meta.text_length, session.embedding_text().chars().count());
    assert_eq!(meta.checksum, confsync::checksum_text(&session.embedding_text()));
    assert!(meta.quality_score >= 0.5);

    // The stored point carries the same vector.
    let (vector, payload) = engine
        .writer()
        .client()
        .point(PRIMARY_NAMESPACE, point_id("s0"))
        .unwrap();
    assert_eq!(vector, entry.record.vector);
    assert_eq!(payload.entity_id, "s0");
    assert_eq!(payload.title, session.title);
}

#[tokio::test]
async fn removed_cache_entries_show_up_as_missing() {
    let sessions: Vec<Session> = (0..6).map(|i| talk(&format!("s{i}"), i)).collect();
    let engine = engine(sessions);
    engine.run_full_sync(SyncOptions::default()).await.unwrap();

    for id in ["s1", "s3", "s5"] {
        engine.cache().remove(&cache_key(id)).await;
    }

    let report = engine.validate_all_embeddings().await.unwrap();
    assert_eq!(report.missing, 3);
    assert_eq!(report.valid, 3);
    assert_eq!(report.invalid, 0);
    assert_eq!(report.drift(), 3);

    let mut flagged: Vec<&str> = report.issues.iter().map(|i| i.entity_id.as_str()).collect();
    flagged.sort_unstable();
    assert_eq!(flagged, ["s1", "s3", "s5"]);
}

#[tokio::test]
async fn only_the_mutated_entity_is_regenerated() {
    let sessions: Vec<Session> = (0..4).map(|i| talk(&format!("s{i}"), i)).collect();
    let engine = engine(sessions);
    engine.run_full_sync(SyncOptions::default()).await.unwrap();

    let before_s2 = engine.cache().get(&cache_key("s2")).await.unwrap();
    engine.catalog().update_description(
        "s0",
        "Completely new abstract after the speaker reworked the talk outline.",
    );

    let metrics = engine.run_full_sync(SyncOptions::default()).await.unwrap();
    assert_eq!(metrics.processed, 1);
    assert_eq!(metrics.cached, 3);

    let after_s2 = engine.cache().get(&cache_key("s2")).await.unwrap();
    assert_eq!(
        after_s2.record.metadata.generated_at,
        before_s2.record.metadata.generated_at
    );

    // The regenerated vector reflects the new text.
    let entry = engine.cache().get(&cache_key("s0")).await.unwrap();
    let expected = engine
        .embedder()
        .inner()
        .vector_for(&engine.catalog().fetch_all().await.unwrap()[0].embedding_text());
    assert_eq!(entry.record.vector, expected);
}

#[tokio::test]
async fn dining_sessions_are_classified_and_double_written() {
    let sessions = vec![
        MockCatalogStore::sample_session(
            "coffee-1",
            "Morning Coffee and Pastries",
            "Coffee service with pastries in the atrium before the opening \
             keynote. A good spot to meet other attendees over breakfast.",
        ),
        talk("talk-1", 1),
    ];
    let engine = engine(sessions);

    engine.run_full_sync(SyncOptions::default()).await.unwrap();

    let store = engine.writer().client();
    assert_eq!(store.point_count(PRIMARY_NAMESPACE).unwrap(), 2);
    assert_eq!(store.point_count(SECONDARY_NAMESPACE).unwrap(), 1);
    assert!(store.contains(SECONDARY_NAMESPACE, point_id("coffee-1")));

    // The dining namespace embeds the narrower dining composition.
    let sessions = engine.catalog().fetch_all().await.unwrap();
    let coffee = sessions.iter().find(|s| s.id == "coffee-1").unwrap();
    let (vector, _) = store
        .point(SECONDARY_NAMESPACE, point_id("coffee-1"))
        .unwrap();
    assert_eq!(vector, engine.embedder().inner().vector_for(&coffee.dining_text()));
}

#[tokio::test]
async fn identical_text_produces_identical_vectors_across_runs() {
    let engine = engine(vec![talk("s0", 1)]);

    engine.run_full_sync(SyncOptions::default()).await.unwrap();
    let first = engine.cache().get(&cache_key("s0")).await.unwrap();

    engine.run_full_sync(SyncOptions::forced()).await.unwrap();
    let second = engine.cache().get(&cache_key("s0")).await.unwrap();

    assert_eq!(first.record.vector, second.record.vector);
    assert_eq!(first.record.metadata.checksum, second.record.metadata.checksum);
}
