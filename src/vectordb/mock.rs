use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use super::client::VectorDbClient;
use super::error::VectorDbError;
use super::model::{SessionPayload, SessionPoint};

#[derive(Default)]
/// In-memory vector store for tests.
pub struct MockVectorDbClient {
    collections: RwLock<HashMap<String, MockCollection>>,
    healthy: AtomicBool,
    fail_upserts: AtomicBool,
}

#[derive(Default)]
struct MockCollection {
    vector_size: u64,
    points: HashMap<u64, (Vec<f32>, SessionPayload)>,
}

impl MockVectorDbClient {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            healthy: AtomicBool::new(true),
            fail_upserts: AtomicBool::new(false),
        }
    }

    /// Number of points in a collection, if it exists.
    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.points.len())
    }

    /// Returns a stored point's vector and payload.
    pub fn point(&self, collection: &str, id: u64) -> Option<(Vec<f32>, SessionPayload)> {
        self.collections
            .read()
            .get(collection)?
            .points
            .get(&id)
            .cloned()
    }

    /// Returns `true` if a point is stored under `id`.
    pub fn contains(&self, collection: &str, id: u64) -> bool {
        self.point(collection, id).is_some()
    }

    /// Toggles the health-check result.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Makes subsequent upserts fail.
    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }
}

impl VectorDbClient for MockVectorDbClient {
    async fn health_check(&self) -> Result<(), VectorDbError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(VectorDbError::ConnectionFailed {
                url: "mock://qdrant".to_string(),
                message: "marked unhealthy".to_string(),
            })
        }
    }

    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.collections
            .write()
            .entry(name.to_string())
            .or_insert(MockCollection {
                vector_size,
                points: HashMap::new(),
            });
        Ok(())
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<SessionPoint>,
    ) -> Result<(), VectorDbError> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: "injected failure".to_string(),
            });
        }

        let mut collections = self.collections.write();
        let coll =
            collections
                .get_mut(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        for point in points {
            if point.vector.len() as u64 != coll.vector_size {
                return Err(VectorDbError::InvalidDimension {
                    expected: coll.vector_size as usize,
                    actual: point.vector.len(),
                });
            }

            coll.points.insert(point.id, (point.vector, point.payload));
        }

        Ok(())
    }
}
