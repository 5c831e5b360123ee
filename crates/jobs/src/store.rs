use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use schemars::JsonSchema;
use sched_core::{TimetableResult, UniversityId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("timetable {0} not found")]
    NotFound(Uuid),
    #[error("timetable store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Current,
    Deprecated,
}

/// One generated timetable of a university. At most one record per
/// university is `Current`.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRecord {
    pub id: Uuid,
    pub university_id: UniversityId,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub result: TimetableResult,
}

#[async_trait]
pub trait TimetableStore: Send + Sync + 'static {
    /// Marks the current record deprecated and returns its id, if any.
    async fn deprecate_current(&self, university: UniversityId) -> Result<Option<Uuid>, StoreError>;

    async fn create_current(
        &self,
        university: UniversityId,
        result: TimetableResult,
    ) -> Result<TimetableRecord, StoreError>;

    /// Makes a previously deprecated record current again.
    async fn restore_current(&self, university: UniversityId, id: Uuid) -> Result<(), StoreError>;

    async fn current(
        &self,
        university: UniversityId,
    ) -> Result<Option<TimetableRecord>, StoreError>;
}

#[derive(Clone, Default)]
pub struct InMemStore {
    inner: Arc<RwLock<HashMap<UniversityId, Vec<TimetableRecord>>>>,
}

impl InMemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record of a university, oldest first.
    pub fn history(&self, university: UniversityId) -> Vec<TimetableRecord> {
        self.inner.read().get(&university).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TimetableStore for InMemStore {
    async fn deprecate_current(
        &self,
        university: UniversityId,
    ) -> Result<Option<Uuid>, StoreError> {
        let mut w = self.inner.write();
        let current = w
            .get_mut(&university)
            .and_then(|records| records.iter_mut().find(|r| r.status == RecordStatus::Current));
        Ok(current.map(|r| {
            r.status = RecordStatus::Deprecated;
            r.id
        }))
    }

    async fn create_current(
        &self,
        university: UniversityId,
        result: TimetableResult,
    ) -> Result<TimetableRecord, StoreError> {
        let record = TimetableRecord {
            id: Uuid::new_v4(),
            university_id: university,
            status: RecordStatus::Current,
            created_at: Utc::now(),
            result,
        };
        let mut w = self.inner.write();
        let records = w.entry(university).or_default();
        for r in records.iter_mut() {
            r.status = RecordStatus::Deprecated;
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn restore_current(&self, university: UniversityId, id: Uuid) -> Result<(), StoreError> {
        let mut w = self.inner.write();
        let records = w.get_mut(&university).ok_or(StoreError::NotFound(id))?;
        if !records.iter().any(|r| r.id == id) {
            return Err(StoreError::NotFound(id));
        }
        for r in records.iter_mut() {
            r.status = if r.id == id {
                RecordStatus::Current
            } else {
                RecordStatus::Deprecated
            };
        }
        Ok(())
    }

    async fn current(
        &self,
        university: UniversityId,
    ) -> Result<Option<TimetableRecord>, StoreError> {
        Ok(self
            .inner
            .read()
            .get(&university)
            .and_then(|records| records.iter().find(|r| r.status == RecordStatus::Current))
            .cloned())
    }
}
