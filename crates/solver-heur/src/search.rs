use sched_core::scoring::PairCost;
use sched_core::{ProblemInstance, SessionAtom, VenueIdx};

use crate::occupancy::Occupancy;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotPair {
    pub slot: usize,
    pub venue: VenueIdx,
    pub cost: PairCost,
}

impl SlotPair {
    pub fn score(&self) -> f64 {
        self.cost.score()
    }
}

/// Weighted violations of putting `atom` at (`slot`, `venue`) given the
/// bookings in `occ`. The caller guarantees the run fits in the day.
pub fn pair_cost(
    problem: &ProblemInstance,
    atom: &SessionAtom,
    occ: &Occupancy,
    slot: usize,
    venue: VenueIdx,
) -> PairCost {
    let lecturer = atom.lecturer();
    let mut cost = PairCost::default();
    for s in slot..slot + atom.duration() {
        if problem.lecturer_unavailable(lecturer, s) {
            cost.unavailable += 1;
        }
        if problem.venue_unavailable(venue, s) {
            cost.unavailable += 1;
        }
        if occ.lecturer_booked(lecturer, s) {
            cost.double_booked += 1;
        }
        if occ.venue_booked(venue, s) {
            cost.double_booked += 1;
        }
        for c in atom.cohorts() {
            if occ.cohort_booked(*c, s) {
                cost.cohort_clashes += 1;
            }
        }
    }
    cost
}

/// Every (slot, venue) pair that breaks nothing, slot ascending then in
/// the atom's venue order.
pub fn feasible_pairs(
    problem: &ProblemInstance,
    atom: &SessionAtom,
    occ: &Occupancy,
) -> Vec<SlotPair> {
    let lecturer = atom.lecturer();
    let mut pairs = Vec::new();

    for start in problem.day_valid_starts(atom.duration()) {
        let run = start..start + atom.duration();

        let lecturer_free = run.clone().all(|s| {
            !problem.lecturer_unavailable(lecturer, s) && !occ.lecturer_booked(lecturer, s)
        });
        if !lecturer_free {
            continue;
        }
        let cohorts_free = run
            .clone()
            .all(|s| atom.cohorts().iter().all(|c| !occ.cohort_booked(*c, s)));
        if !cohorts_free {
            continue;
        }

        for &venue in atom.venues() {
            let venue_free = run
                .clone()
                .all(|s| !problem.venue_unavailable(venue, s) && !occ.venue_booked(venue, s));
            if venue_free {
                pairs.push(SlotPair {
                    slot: start,
                    venue,
                    cost: PairCost::default(),
                });
            }
        }
    }
    pairs
}

/// The pair with the lowest weighted cost, first found on ties.
pub fn least_bad_pair(
    problem: &ProblemInstance,
    atom: &SessionAtom,
    occ: &Occupancy,
) -> SlotPair {
    let mut best: Option<SlotPair> = None;

    'search: for start in problem.day_valid_starts(atom.duration()) {
        for &venue in atom.venues() {
            let cost = pair_cost(problem, atom, occ, start, venue);
            if best.map_or(true, |b| cost.score() < b.score()) {
                best = Some(SlotPair {
                    slot: start,
                    venue,
                    cost,
                });
                if cost.is_free() {
                    break 'search;
                }
            }
        }
    }

    // atoms always have a venue and fit a day, so start 0 exists
    best.unwrap_or_else(|| {
        let venue = atom.venues()[0];
        SlotPair {
            slot: 0,
            venue,
            cost: pair_cost(problem, atom, occ, 0, venue),
        }
    })
}
