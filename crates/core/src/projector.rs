use types::ScheduledSession;

use crate::grid::TimeGrid;
use crate::index::Indexer;
use crate::placement::Candidate;
use crate::problem::ProblemInstance;

/// Maps a candidate's indices back to external ids and wall-clock times.
/// Sessions come out ordered by slot, then session index.
pub fn project(
    indexer: &Indexer,
    grid: &TimeGrid,
    problem: &ProblemInstance,
    candidate: &Candidate,
) -> Vec<ScheduledSession> {
    let per_day = grid.slots_per_day();
    let mut placements: Vec<_> = candidate.placements.iter().collect();
    placements.sort_by_key(|p| (p.slot, p.session));

    placements
        .into_iter()
        .filter_map(|p| {
            let atom = problem.atom(p.session);
            let (day, start) = grid.locate(p.slot)?;
            let end = grid.time_of(p.slot % per_day + atom.duration());
            Some(ScheduledSession {
                session_index: p.session,
                course_id: indexer.course_id(p.course),
                venue_id: indexer.venue_id(p.venue),
                lecturer_id: indexer.lecturer_id(atom.lecturer()),
                cohort_ids: atom.cohorts().iter().map(|c| indexer.cohort_id(*c)).collect(),
                day,
                start_time: start.format("%H:%M").to_string(),
                end_time: end.format("%H:%M").to_string(),
                duration: atom.duration() as u32,
                conflict: p.conflict,
                score: p.score,
            })
        })
        .collect()
}
