pub mod construct;
pub mod genetic;
pub mod occupancy;
pub mod search;

#[cfg(test)]
mod fixtures;

use async_trait::async_trait;
use sched_core::projector::project;
use sched_core::scoring::audit;
use sched_core::{
    build_problem, validate_params, BuiltProblem, ConfigError, GaParams, GenerateRequest, Indexer,
    ProblemInstance, Snapshot, Solver, TimeGrid, TimetableResult,
};
use tracing::info;

pub use genetic::{Engine, Evolution};

#[derive(Clone, Debug)]
pub enum Outcome {
    /// Every course was skipped; the engine did not run.
    NothingToSchedule,
    Scheduled(Evolution),
}

/// Runs the genetic engine on an already built problem.
pub fn run(problem: &ProblemInstance, params: &GaParams) -> Result<Outcome, ConfigError> {
    validate_params(params)?;
    if problem.is_empty() {
        return Ok(Outcome::NothingToSchedule);
    }
    Ok(Outcome::Scheduled(Engine::new(problem, params).evolve()))
}

/// Everything one run produced, kept together so the winner can be mapped
/// back to external ids.
#[derive(Clone, Debug)]
pub struct Built {
    pub indexer: Indexer,
    pub grid: TimeGrid,
    pub problem: BuiltProblem,
    pub params: GaParams,
    pub outcome: Outcome,
}

pub fn build_timetable(
    snapshot: &Snapshot,
    start_of_day: &str,
    end_of_day: &str,
    params: &GaParams,
) -> Result<Built, ConfigError> {
    validate_params(params)?;
    let grid = TimeGrid::weekly(start_of_day, end_of_day)?;
    let indexer = Indexer::from_snapshot(snapshot);
    let problem = build_problem(snapshot, &indexer, &grid);
    let outcome = run(&problem.instance, params)?;

    Ok(Built {
        indexer,
        grid,
        problem,
        params: params.clone(),
        outcome,
    })
}

impl Built {
    pub fn to_result(&self) -> TimetableResult {
        let start_of_day = self.grid.start_of_day().format("%H:%M").to_string();
        let end_of_day = self.grid.end_of_day().format("%H:%M").to_string();
        let instance = &self.problem.instance;

        match &self.outcome {
            Outcome::NothingToSchedule => TimetableResult {
                status: TimetableResult::NOTHING_TO_SCHEDULE.into(),
                fitness: 0.0,
                start_of_day,
                end_of_day,
                sessions: vec![],
                skipped: self.problem.skipped.clone(),
                stats: serde_json::json!({
                    "method": "ga",
                    "atoms": 0,
                    "skipped": self.problem.skipped.len(),
                }),
            },
            Outcome::Scheduled(evolution) => {
                let best = &evolution.best;
                let report = audit(instance, &best.placements);
                TimetableResult {
                    status: TimetableResult::SOLVED.into(),
                    fitness: best.fitness,
                    start_of_day,
                    end_of_day,
                    sessions: project(&self.indexer, &self.grid, instance, best),
                    skipped: self.problem.skipped.clone(),
                    stats: serde_json::json!({
                        "method": "ga",
                        "population": self.params.population_size,
                        "generations": self.params.generations,
                        "seed": self.params.seed,
                        "atoms": instance.atoms().len(),
                        "slotsPerDay": instance.slots_per_day(),
                        "conflicts": best.conflicts(),
                        "totalScore": best.total_score(),
                        "audit": report,
                    }),
                }
            }
        }
    }
}

/// Genetic timetable solver. The run is CPU bound, so it is moved off the
/// async executor.
#[derive(Clone, Debug, Default)]
pub struct GaSolver;

impl GaSolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Solver for GaSolver {
    async fn solve(&self, request: GenerateRequest) -> anyhow::Result<TimetableResult> {
        let result = tokio::task::spawn_blocking(move || {
            build_timetable(
                &request.snapshot,
                &request.start_of_day,
                &request.end_of_day,
                &request.params,
            )
            .map(|built| built.to_result())
        })
        .await??;

        info!(
            status = %result.status,
            fitness = result.fitness,
            sessions = result.sessions.len(),
            skipped = result.skipped.len(),
            "timetable generated"
        );
        Ok(result)
    }
}
