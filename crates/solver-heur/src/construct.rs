use rand::Rng;
use sched_core::{Candidate, Placement, ProblemInstance, SessionAtom};

use crate::occupancy::Occupancy;
use crate::search::{feasible_pairs, least_bad_pair, SlotPair};

/// Lower is harder: few venue choices and long sessions go first.
pub fn difficulty(atom: &SessionAtom) -> f64 {
    0.5 * atom.venues().len() as f64 + 1.0 * atom.duration() as f64
}

/// Session indices hardest first; equal difficulty keeps session order.
pub fn placement_order(problem: &ProblemInstance) -> Vec<usize> {
    let mut order: Vec<usize> = (0..problem.atoms().len()).collect();
    order.sort_by(|&a, &b| difficulty(problem.atom(a)).total_cmp(&difficulty(problem.atom(b))));
    order
}

/// Uniform pick among the first `k` pairs (all of them if fewer).
pub fn choose_top_k<'a, R: Rng + ?Sized>(
    pairs: &'a [SlotPair],
    k: usize,
    rng: &mut R,
) -> &'a SlotPair {
    let width = k.max(1).min(pairs.len());
    &pairs[rng.gen_range(0..width)]
}

/// Greedy randomized construction of one complete timetable. Returns the
/// candidate together with the bookings it made.
pub fn build_candidate<R: Rng + ?Sized>(
    problem: &ProblemInstance,
    rng: &mut R,
    sample_width: usize,
) -> (Candidate, Occupancy) {
    let mut occ = Occupancy::new(problem);
    let mut placements: Vec<Placement> = Vec::with_capacity(problem.atoms().len());

    for session in placement_order(problem) {
        let atom = problem.atom(session);
        let feasible = feasible_pairs(problem, atom, &occ);

        let (pair, conflict) = if feasible.is_empty() {
            (least_bad_pair(problem, atom, &occ), true)
        } else {
            (*choose_top_k(&feasible, sample_width, rng), false)
        };

        placements.push(Placement {
            session,
            course: atom.course(),
            venue: pair.venue,
            slot: pair.slot,
            conflict,
            score: pair.score(),
        });
        occ.occupy(atom, pair.slot, pair.venue);
    }

    placements.sort_by_key(|p| p.session);
    (Candidate::new(placements), occ)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Scenario;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use sched_core::scoring::audit;
    use types::DayOfWeek;

    #[test]
    fn hardest_sessions_are_placed_first() {
        let mut sc = Scenario::new(1, 3, 1);
        sc.course(0, &[0, 1, 2], &[0], 1, 1); // 2.5
        sc.course(0, &[0], &[0], 1, 2); // 2.5
        sc.course(0, &[0], &[0], 1, 1); // 1.5
        let (_, _, p) = sc.build_on(Scenario::grid("08:00", "12:00", &DayOfWeek::WEEKDAYS));
        assert_eq!(placement_order(&p), vec![2, 0, 1]);
    }

    #[test]
    fn top_k_sampling_stays_in_the_window() {
        let mut sc = Scenario::new(1, 1, 1);
        sc.course(0, &[0], &[0], 1, 1);
        let (_, _, p) = sc.build_on(Scenario::grid("08:00", "12:00", &DayOfWeek::WEEKDAYS));
        let occ = Occupancy::new(&p);
        let pairs = feasible_pairs(&p, p.atom(0), &occ);
        assert_eq!(pairs.len(), 20);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(choose_top_k(&pairs, 3, &mut rng).slot < 3);
        }
        assert_eq!(choose_top_k(&pairs[..1], 5, &mut rng).slot, 0);
        assert_eq!(choose_top_k(&pairs, 0, &mut rng).slot, 0);
    }

    #[test]
    fn builds_a_clean_timetable_when_room_allows() {
        let mut sc = Scenario::new(2, 2, 2);
        sc.course(0, &[0, 1], &[0], 3, 2);
        sc.course(1, &[0], &[0, 1], 2, 1);
        sc.course(0, &[1], &[1], 2, 1);
        let (_, _, p) = sc.build_on(Scenario::grid("08:00", "14:00", &DayOfWeek::WEEKDAYS));

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (cand, _) = build_candidate(&p, &mut rng, 5);
        assert_eq!(cand.placements.len(), 7);
        for (i, pl) in cand.placements.iter().enumerate() {
            assert_eq!(pl.session, i);
            assert!(!pl.conflict);
        }
        assert_eq!(cand.fitness, 1.0);
        assert!(audit(&p, &cand.placements).is_clean());
    }

    #[test]
    fn overbooked_session_falls_back_to_least_bad() {
        let mut sc = Scenario::new(1, 1, 1);
        sc.course(0, &[0], &[0], 2, 1);
        let (_, _, p) = sc.build_on(Scenario::grid("08:00", "09:00", &[DayOfWeek::Mon]));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (cand, occ) = build_candidate(&p, &mut rng, 5);

        assert_eq!(cand.conflicts(), 1);
        assert!(!cand.placements[0].conflict);
        assert!(cand.placements[1].conflict);
        // lecturer + venue double booked, cohort clash
        assert_eq!(cand.placements[1].score, 3500.0);
        assert!(cand.fitness < 1.0);
        assert!(occ.venue_booked(p.atom(0).venues()[0], 0));
    }
}
