pub mod service;
pub mod store;
pub mod view;

use parking_lot::RwLock;
use schemars::JsonSchema;
use sched_core::{GenerateRequest, Solver, TimetableResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

pub use service::TimetableService;
pub use store::{InMemStore, RecordStatus, StoreError, TimetableRecord, TimetableStore};
pub use view::{week_view, DayView, SlotEntry, WeekView};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct JobId(pub String);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, JsonSchema)]
#[serde(tag = "status")]
pub enum JobStatus {
    Queued,
    Running,
    Solved { result: TimetableResult },
    Failed { message: String },
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Solved { .. } | JobStatus::Failed { .. })
    }
}

/// Background generation runs, tracked in memory by id.
#[derive(Clone)]
pub struct InMemJobs<S: Solver> {
    inner: Arc<RwLock<HashMap<String, JobStatus>>>,
    solver: Arc<S>,
}

impl<S: Solver> InMemJobs<S> {
    pub fn new(solver: S) -> Self {
        Self {
            inner: Default::default(),
            solver: Arc::new(solver),
        }
    }

    /// Must be called inside a tokio runtime.
    pub fn enqueue(&self, request: GenerateRequest) -> JobId {
        let id = Uuid::new_v4().to_string();
        self.inner.write().insert(id.clone(), JobStatus::Queued);

        let map = self.inner.clone();
        let solver = self.solver.clone();
        let id_for_task = id.clone();

        tokio::spawn(async move {
            map.write().insert(id_for_task.clone(), JobStatus::Running);
            match solver.solve(request).await {
                Ok(result) => {
                    info!(job = %id_for_task, status = %result.status, "job finished");
                    map.write().insert(id_for_task, JobStatus::Solved { result });
                }
                Err(e) => {
                    error!(job = %id_for_task, err = %e, "job failed");
                    map.write().insert(
                        id_for_task,
                        JobStatus::Failed {
                            message: e.to_string(),
                        },
                    );
                }
            }
        });

        JobId(id)
    }

    pub fn get(&self, id: &JobId) -> Option<JobStatus> {
        self.inner.read().get(&id.0).cloned()
    }
}
