use sched_core::{GaParams, GenerateRequest, SnapshotSource, Solver, TimetableResult, UniversityId};
use std::sync::Arc;
use tracing::{error, info};
use types::CohortId;

use crate::store::{TimetableRecord, TimetableStore};
use crate::view::{week_view, WeekView};

/// Generates timetables from a university's data and keeps exactly one of
/// them current in the store.
pub struct TimetableService<Src, St, S> {
    source: Arc<Src>,
    store: Arc<St>,
    solver: Arc<S>,
}

impl<Src, St, S> Clone for TimetableService<Src, St, S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            store: self.store.clone(),
            solver: self.solver.clone(),
        }
    }
}

impl<Src, St, S> TimetableService<Src, St, S>
where
    Src: SnapshotSource,
    St: TimetableStore,
    S: Solver,
{
    pub fn new(source: Src, store: Arc<St>, solver: S) -> Self {
        Self {
            source: Arc::new(source),
            store,
            solver: Arc::new(solver),
        }
    }

    /// Solves for `university` and replaces its current timetable. When the
    /// new record cannot be written, the previous one is made current again
    /// and the write error is returned. Nothing is stored when there was
    /// nothing to schedule.
    pub async fn generate(
        &self,
        university: UniversityId,
        start_of_day: &str,
        end_of_day: &str,
        params: GaParams,
    ) -> anyhow::Result<TimetableResult> {
        let snapshot = self.source.snapshot(university).await?;
        let result = self
            .solver
            .solve(GenerateRequest {
                snapshot,
                start_of_day: start_of_day.to_string(),
                end_of_day: end_of_day.to_string(),
                params,
            })
            .await?;

        if !result.is_solved() || result.sessions.is_empty() {
            info!(%university, status = %result.status, "nothing stored");
            return Ok(result);
        }

        let previous = self.store.deprecate_current(university).await.map_err(|e| {
            error!(%university, err = %e, "deprecating current timetable failed");
            e
        })?;

        match self.store.create_current(university, result.clone()).await {
            Ok(record) => {
                info!(
                    %university,
                    record = %record.id,
                    fitness = result.fitness,
                    "timetable stored"
                );
                Ok(result)
            }
            Err(e) => {
                if let Some(id) = previous {
                    if let Err(restore) = self.store.restore_current(university, id).await {
                        error!(
                            %university,
                            record = %id,
                            err = %restore,
                            "restoring previous timetable failed"
                        );
                    }
                }
                error!(%university, err = %e, "storing timetable failed");
                Err(e.into())
            }
        }
    }

    pub async fn current(
        &self,
        university: UniversityId,
    ) -> anyhow::Result<Option<TimetableRecord>> {
        Ok(self.store.current(university).await?)
    }

    /// The current timetable as seen by one cohort.
    pub async fn cohort_timetable(
        &self,
        university: UniversityId,
        cohort: CohortId,
    ) -> anyhow::Result<Option<WeekView>> {
        let Some(record) = self.store.current(university).await? else {
            return Ok(None);
        };
        let snapshot = self.source.snapshot(university).await?;
        Ok(week_view(cohort, &record.result, &snapshot)?)
    }
}
