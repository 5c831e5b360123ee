use sched_core::{CohortIdx, LecturerIdx, ProblemInstance, SessionAtom, VenueIdx};

/// Bookings made so far by one in-progress candidate. Cells count
/// bookings, so releasing one of two overlapping sessions keeps the other.
#[derive(Clone, Debug)]
pub struct Occupancy {
    slots: usize,
    venue: Vec<u16>,
    lecturer: Vec<u16>,
    cohort: Vec<u16>,
}

impl Occupancy {
    pub fn new(problem: &ProblemInstance) -> Self {
        let slots = problem.total_slots();
        Self {
            slots,
            venue: vec![0; problem.num_venues() * slots],
            lecturer: vec![0; problem.num_lecturers() * slots],
            cohort: vec![0; problem.num_cohorts() * slots],
        }
    }

    #[inline]
    pub fn venue_booked(&self, venue: VenueIdx, slot: usize) -> bool {
        self.venue[venue.get() * self.slots + slot] > 0
    }

    #[inline]
    pub fn lecturer_booked(&self, lecturer: LecturerIdx, slot: usize) -> bool {
        self.lecturer[lecturer.get() * self.slots + slot] > 0
    }

    #[inline]
    pub fn cohort_booked(&self, cohort: CohortIdx, slot: usize) -> bool {
        self.cohort[cohort.get() * self.slots + slot] > 0
    }

    pub fn occupy(&mut self, atom: &SessionAtom, slot: usize, venue: VenueIdx) {
        self.apply(atom, slot, venue, |n| *n = n.saturating_add(1));
    }

    pub fn release(&mut self, atom: &SessionAtom, slot: usize, venue: VenueIdx) {
        self.apply(atom, slot, venue, |n| *n = n.saturating_sub(1));
    }

    fn apply(&mut self, atom: &SessionAtom, slot: usize, venue: VenueIdx, f: impl Fn(&mut u16)) {
        let end = (slot + atom.duration()).min(self.slots);
        for s in slot..end {
            f(&mut self.venue[venue.get() * self.slots + s]);
            f(&mut self.lecturer[atom.lecturer().get() * self.slots + s]);
            for c in atom.cohorts() {
                f(&mut self.cohort[c.get() * self.slots + s]);
            }
        }
    }
}
