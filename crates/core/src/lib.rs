pub mod error;
pub mod grid;
pub mod index;
pub mod placement;
pub mod problem;
pub mod projector;
pub mod scoring;

use async_trait::async_trait;

pub use error::ConfigError;
pub use grid::TimeGrid;
pub use index::{CohortIdx, CourseIdx, Indexer, LecturerIdx, VenueIdx};
pub use placement::{Candidate, Placement};
pub use problem::{build_problem, BuiltProblem, ProblemInstance, SessionAtom, SkipReason};
pub use types::{
    GaParams, GenerateRequest, ScheduledSession, SkippedCourse, Snapshot, TimetableResult,
    UniversityId,
};

/// Rejects parameter sets the engine cannot run with, listing every problem.
pub fn validate_params(params: &GaParams) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if params.population_size == 0 {
        errors.push("populationSize must be at least 1".into());
    }
    if params.sample_width == 0 {
        errors.push("sampleWidth must be at least 1".into());
    }
    fn chk_fraction(name: &str, v: f64, errors: &mut Vec<String>) {
        if !(0.0..=1.0).contains(&v) {
            errors.push(format!("{name} must be within [0, 1], got {v}"));
        }
    }
    chk_fraction("eliteFraction", params.elite_fraction, &mut errors);
    chk_fraction("mutationRate", params.mutation_rate, &mut errors);
    chk_fraction("directedShare", params.directed_share, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Params(errors.join("; ")))
    }
}

/// Builds a timetable for one request.
#[async_trait]
pub trait Solver: Send + Sync + 'static {
    async fn solve(&self, request: GenerateRequest) -> anyhow::Result<TimetableResult>;
}

/// Read-only access to one university's entities and calendars.
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    async fn snapshot(&self, university: UniversityId) -> anyhow::Result<Snapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert_eq!(validate_params(&GaParams::default()), Ok(()));
    }

    #[test]
    fn lists_every_bad_param() {
        let params = GaParams {
            population_size: 0,
            mutation_rate: 1.5,
            directed_share: -0.1,
            ..GaParams::default()
        };
        let Err(ConfigError::Params(msg)) = validate_params(&params) else {
            panic!("expected a params error");
        };
        assert!(msg.contains("populationSize"));
        assert!(msg.contains("mutationRate"));
        assert!(msg.contains("directedShare"));
        assert!(!msg.contains("eliteFraction"));
    }
}
