use serde::Serialize;

use crate::placement::Placement;
use crate::problem::ProblemInstance;

/// Per slot a lecturer or venue is booked against its calendar.
pub const UNAVAILABLE_PENALTY: f64 = 10.0;
/// Per slot a lecturer or venue is booked twice.
pub const DOUBLE_BOOKING_PENALTY: f64 = 1500.0;
/// Per slot and cohort booked twice.
pub const COHORT_CLASH_PENALTY: f64 = 500.0;

/// Violation counts of a single (slot, venue) choice, in slot units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PairCost {
    pub unavailable: u32,
    pub double_booked: u32,
    pub cohort_clashes: u32,
}

impl PairCost {
    pub fn score(&self) -> f64 {
        self.unavailable as f64 * UNAVAILABLE_PENALTY
            + self.double_booked as f64 * DOUBLE_BOOKING_PENALTY
            + self.cohort_clashes as f64 * COHORT_CLASH_PENALTY
    }

    pub fn is_free(&self) -> bool {
        self.unavailable == 0 && self.double_booked == 0 && self.cohort_clashes == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ConflictReport {
    pub venue_double_booked: u64,
    pub lecturer_double_booked: u64,
    pub cohort_double_booked: u64,
    pub lecturer_unavailable: u64,
    pub venue_unavailable: u64,
    pub day_boundary_violations: u64,
    pub flagged_placements: u64,
    pub objective: f64,
}

impl ConflictReport {
    pub fn hard_clashes(&self) -> u64 {
        self.venue_double_booked + self.lecturer_double_booked + self.cohort_double_booked
    }

    pub fn is_clean(&self) -> bool {
        self.hard_clashes() == 0
            && self.lecturer_unavailable == 0
            && self.venue_unavailable == 0
            && self.day_boundary_violations == 0
    }
}

/// Re-derives every conflict of a placement set from scratch, ignoring the
/// scores stored on the placements. A slot booked `n` times counts `n - 1`.
pub fn audit(problem: &ProblemInstance, placements: &[Placement]) -> ConflictReport {
    let slots = problem.total_slots();
    let mut venue = vec![0u32; problem.num_venues() * slots];
    let mut lecturer = vec![0u32; problem.num_lecturers() * slots];
    let mut cohort = vec![0u32; problem.num_cohorts() * slots];
    let mut report = ConflictReport::default();

    for p in placements {
        let atom = problem.atom(p.session);
        if p.conflict {
            report.flagged_placements += 1;
        }
        if !problem.fits_in_day(p.slot, atom.duration()) {
            report.day_boundary_violations += 1;
        }
        let end = (p.slot + atom.duration()).min(slots);
        for s in p.slot..end {
            if problem.lecturer_unavailable(atom.lecturer(), s) {
                report.lecturer_unavailable += 1;
            }
            if problem.venue_unavailable(p.venue, s) {
                report.venue_unavailable += 1;
            }
            venue[p.venue.get() * slots + s] += 1;
            lecturer[atom.lecturer().get() * slots + s] += 1;
            for c in atom.cohorts() {
                cohort[c.get() * slots + s] += 1;
            }
        }
    }

    let extra = |cells: &[u32]| cells.iter().map(|&n| n.saturating_sub(1) as u64).sum::<u64>();
    report.venue_double_booked = extra(&venue);
    report.lecturer_double_booked = extra(&lecturer);
    report.cohort_double_booked = extra(&cohort);

    report.objective = (report.lecturer_unavailable + report.venue_unavailable) as f64
        * UNAVAILABLE_PENALTY
        + (report.venue_double_booked + report.lecturer_double_booked) as f64
            * DOUBLE_BOOKING_PENALTY
        + report.cohort_double_booked as f64 * COHORT_CLASH_PENALTY;
    report
}
