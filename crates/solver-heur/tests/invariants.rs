mod common;

use common::Scenario;
use proptest::prelude::*;
use sched_core::scoring::audit;
use sched_core::{Candidate, GaParams, ProblemInstance};
use solver_heur::{run, Outcome};
use types::DayOfWeek;

#[derive(Clone, Debug)]
struct CourseShape {
    lecturer: usize,
    venues: Vec<usize>,
    cohorts: Vec<usize>,
    sessions: u32,
    duration: u32,
}

fn course_shape() -> impl Strategy<Value = CourseShape> {
    (
        0..3usize,
        prop::collection::btree_set(0..3usize, 1..=3),
        prop::collection::btree_set(0..3usize, 1..=2),
        1..=3u32,
        1..=3u32,
    )
        .prop_map(|(lecturer, venues, cohorts, sessions, duration)| CourseShape {
            lecturer,
            venues: venues.into_iter().collect(),
            cohorts: cohorts.into_iter().collect(),
            sessions,
            duration,
        })
}

fn university() -> impl Strategy<Value = (Scenario, usize, usize)> {
    (prop::collection::vec(course_shape(), 1..6), 3..=6usize, 1..=3usize).prop_map(
        |(courses, hours, days)| {
            let mut uni = Scenario::new(3, 3, 3);
            for c in &courses {
                uni.course(c.lecturer, &c.venues, &c.cohorts, c.sessions, c.duration);
            }
            // lecturer 0 is always away on the first morning
            uni.lecturer_off(0, "Monday", "08:00", "10:00");
            (uni, hours, days)
        },
    )
}

fn overlap(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.0 + b.1 && b.0 < a.0 + a.1
}

/// Every placement on an unavailable slot is flagged, and every clashing
/// pair has at least one flagged member; the session placed first stays
/// unflagged.
fn assert_conflicts_are_flagged(problem: &ProblemInstance, best: &Candidate) {
    let ps = &best.placements;
    for (i, p) in ps.iter().enumerate() {
        let a = problem.atom(p.session);
        let covered = p.slot..p.slot + a.duration();
        let unavailable = covered.clone().any(|s| {
            problem.lecturer_unavailable(a.lecturer(), s) || problem.venue_unavailable(p.venue, s)
        });
        if unavailable {
            assert!(p.conflict, "placement {i} sits on an unavailable slot unflagged");
        }
        for q in &ps[i + 1..] {
            let b = problem.atom(q.session);
            if !overlap((p.slot, a.duration()), (q.slot, b.duration())) {
                continue;
            }
            let shared = p.venue == q.venue
                || a.lecturer() == b.lecturer()
                || a.cohorts().iter().any(|c| b.cohorts().contains(c));
            if shared {
                assert!(
                    p.conflict || q.conflict,
                    "sessions {} and {} clash with neither flagged",
                    p.session,
                    q.session
                );
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn engine_output_is_complete_and_day_valid(
        (uni, hours, days) in university(),
        seed in any::<u64>(),
    ) {
        let end = format!("{:02}:00", 8 + hours);
        let grid = Scenario::grid("08:00", &end, &DayOfWeek::WEEKDAYS[..days]);
        let (_, _, instance) = uni.build_on(grid);
        let problem = &instance;
        let params = GaParams {
            population_size: 8,
            generations: 4,
            seed,
            ..GaParams::default()
        };

        let outcome = run(problem, &params).unwrap();
        let best = match outcome {
            Outcome::Scheduled(evolution) => evolution.best,
            Outcome::NothingToSchedule => {
                prop_assert!(problem.is_empty());
                return Ok(());
            }
        };

        prop_assert_eq!(best.placements.len(), problem.atoms().len());
        for (i, p) in best.placements.iter().enumerate() {
            let atom = problem.atom(i);
            prop_assert_eq!(p.session, i);
            prop_assert_eq!(p.course, atom.course());
            prop_assert!(atom.venues().contains(&p.venue));
            prop_assert!(problem.fits_in_day(p.slot, atom.duration()));
        }

        let expected = 1.0 / (1.0 + best.placements.iter().map(|p| p.score).sum::<f64>());
        prop_assert_eq!(best.fitness, expected);
        if best.conflicts() == 0 {
            prop_assert_eq!(best.fitness, 1.0);
            prop_assert!(audit(problem, &best.placements).is_clean());
        }
        prop_assert_eq!(audit(problem, &best.placements).day_boundary_violations, 0);
        assert_conflicts_are_flagged(problem, &best);
    }
}
