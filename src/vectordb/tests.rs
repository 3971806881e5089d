use super::client::VectorDbClient;
use super::error::VectorDbError;
use super::mock::MockVectorDbClient;
use super::model::SessionPoint;
use crate::catalog::MockCatalogStore;
use crate::hashing::point_id;

const TEST_COLLECTION: &str = "sessions";
const TEST_VECTOR_SIZE: u64 = 8;

fn create_test_point(id: &str) -> SessionPoint {
    let session = MockCatalogStore::sample_session(
        id,
        "Fearless Concurrency",
        "Ownership, Send and Sync in production systems.",
    );
    SessionPoint::new(&session, vec![0.5; TEST_VECTOR_SIZE as usize])
}

#[tokio::test]
async fn test_ensure_collection_idempotent() {
    let client = MockVectorDbClient::new();

    client
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();
    client
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    assert_eq!(client.point_count(TEST_COLLECTION), Some(0));
}

#[tokio::test]
async fn test_upsert_is_idempotent_per_entity() {
    let client = MockVectorDbClient::new();
    client
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    client
        .upsert_points(TEST_COLLECTION, vec![create_test_point("sess-1")])
        .await
        .unwrap();
    client
        .upsert_points(TEST_COLLECTION, vec![create_test_point("sess-1")])
        .await
        .unwrap();

    // Same entity id hashes to the same point id: still one point.
    assert_eq!(client.point_count(TEST_COLLECTION), Some(1));
    assert!(client.contains(TEST_COLLECTION, point_id("sess-1")));
}

#[tokio::test]
async fn test_upsert_rejects_wrong_dimension() {
    let client = MockVectorDbClient::new();
    client
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    let session = MockCatalogStore::sample_session("sess-1", "Title", "Description.");
    let bad = SessionPoint::new(&session, vec![0.5; 4]);

    let err = client
        .upsert_points(TEST_COLLECTION, vec![bad])
        .await
        .expect_err("dimension mismatch");
    assert!(matches!(err, VectorDbError::InvalidDimension { expected: 8, actual: 4 }));
}

#[tokio::test]
async fn test_upsert_unknown_collection() {
    let client = MockVectorDbClient::new();
    let err = client
        .upsert_points("missing", vec![create_test_point("sess-1")])
        .await
        .expect_err("collection not found");
    assert!(matches!(err, VectorDbError::CollectionNotFound { .. }));
}

#[tokio::test]
async fn test_health_toggle() {
    let client = MockVectorDbClient::new();
    assert!(client.health_check().await.is_ok());
    client.set_healthy(false);
    assert!(client.health_check().await.is_err());
}

#[test]
fn test_payload_carries_filter_fields() {
    let session = MockCatalogStore::sample_session(
        "sess-9",
        "Zero-Copy Parsing",
        "Borrowed deserialization with serde.",
    );
    let point = SessionPoint::new(&session, vec![0.0; 4]);

    assert_eq!(point.id, point_id("sess-9"));
    assert_eq!(point.payload.entity_id, "sess-9");
    assert_eq!(point.payload.title, "Zero-Copy Parsing");
    assert_eq!(point.payload.track, "Systems");
    assert_eq!(point.payload.tags, "rust, performance");
    assert_eq!(point.payload.speakers, "Jordan Reyes");
    assert_eq!(point.payload.starts_at, session.starts_at.timestamp());
    assert_eq!(point.payload.last_updated, session.last_updated.timestamp());
}
