use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use super::error::CatalogError;
use super::model::Session;
use super::CatalogStore;

/// In-memory catalog for tests.
#[derive(Default)]
pub struct MockCatalogStore {
    sessions: Mutex<HashMap<String, Session>>,
    backups: Mutex<HashMap<String, (Vec<f32>, DateTime<Utc>)>>,
    fail_backups: Mutex<bool>,
}

impl MockCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the catalog with `sessions`.
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        let store = Self::new();
        for session in sessions {
            store.insert(session);
        }
        store
    }

    /// Inserts or replaces a session.
    pub fn insert(&self, session: Session) {
        self.sessions.lock().insert(session.id.clone(), session);
    }

    /// Rewrites a session's description and bumps `last_updated`.
    pub fn update_description(&self, entity_id: &str, description: &str) {
        if let Some(session) = self.sessions.lock().get_mut(entity_id) {
            session.description = description.to_string();
            session.last_updated = Utc::now();
        }
    }

    /// Rewrites the description without touching `last_updated` (content drift
    /// that only the checksum can catch).
    pub fn update_description_silently(&self, entity_id: &str, description: &str) {
        if let Some(session) = self.sessions.lock().get_mut(entity_id) {
            session.description = description.to_string();
        }
    }

    /// Returns the recorded vector backup for an entity, if any.
    pub fn backup(&self, entity_id: &str) -> Option<(Vec<f32>, DateTime<Utc>)> {
        self.backups.lock().get(entity_id).cloned()
    }

    /// Number of sessions with a recorded backup.
    pub fn backup_count(&self) -> usize {
        self.backups.lock().len()
    }

    /// Makes subsequent backup writes fail.
    pub fn fail_backups(&self, fail: bool) {
        *self.fail_backups.lock() = fail;
    }

    /// Builds a plausible session for tests.
    pub fn sample_session(id: &str, title: &str, description: &str) -> Session {
        let starts_at = Utc::now() - Duration::hours(1);
        Session {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            track: "Systems".to_string(),
            tags: vec!["rust".to_string(), "performance".to_string()],
            speakers: vec!["Jordan Reyes".to_string()],
            starts_at,
            ends_at: starts_at + Duration::minutes(45),
            last_updated: Utc::now() - Duration::minutes(30),
        }
    }
}

impl CatalogStore for MockCatalogStore {
    async fn fetch_all(&self) -> Result<Vec<Session>, CatalogError> {
        let mut sessions: Vec<Session> = self.sessions.lock().values().cloned().collect();
        sessions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(sessions)
    }

    async fn fetch_updated_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Session>, CatalogError> {
        let mut sessions: Vec<Session> = self
            .sessions
            .lock()
            .values()
            .filter(|s| s.last_updated >= cutoff)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(sessions)
    }

    async fn write_vector_backup(
        &self,
        entity_id: &str,
        vector: &[f32],
        last_updated: DateTime<Utc>,
    ) -> Result<(), CatalogError> {
        if *self.fail_backups.lock() {
            return Err(CatalogError::BackupFailed {
                entity_id: entity_id.to_string(),
                message: "injected failure".to_string(),
            });
        }

        self.backups
            .lock()
            .insert(entity_id.to_string(), (vector.to_vec(), last_updated));
        Ok(())
    }
}
