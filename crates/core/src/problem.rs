use std::collections::{HashMap, HashSet};
use std::ops::Range;
use thiserror::Error;
use tracing::{debug, info, warn};
use types::{CohortId, CourseId, LecturerId, SkippedCourse, Snapshot, VenueId};

use crate::grid::TimeGrid;
use crate::index::{CohortIdx, CourseIdx, Indexer, LecturerIdx, VenueIdx};

/// Row-major `rows x slots` boolean matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotMask {
    slots: usize,
    cells: Vec<bool>,
}

impl SlotMask {
    pub fn new(rows: usize, slots: usize) -> Self {
        Self {
            slots,
            cells: vec![false; rows * slots],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, slot: usize) -> bool {
        self.cells[row * self.slots + slot]
    }

    pub fn mark(&mut self, row: usize, range: Range<usize>) {
        let base = row * self.slots;
        for s in range {
            self.cells[base + s] = true;
        }
    }
}

/// One weekly occurrence of a course: the unit the engine places.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionAtom {
    session: usize,
    course: CourseIdx,
    lecturer: LecturerIdx,
    cohorts: Box<[CohortIdx]>,
    venues: Box<[VenueIdx]>,
    duration: usize,
}

impl SessionAtom {
    pub fn session(&self) -> usize {
        self.session
    }
    pub fn course(&self) -> CourseIdx {
        self.course
    }
    pub fn lecturer(&self) -> LecturerIdx {
        self.lecturer
    }
    /// Never empty.
    pub fn cohorts(&self) -> &[CohortIdx] {
        &self.cohorts
    }
    /// Never empty.
    pub fn venues(&self) -> &[VenueIdx] {
        &self.venues
    }
    /// In slots, `1..=slots_per_day`.
    pub fn duration(&self) -> usize {
        self.duration
    }
}

/// Immutable input of one engine run, shared read-only by every candidate.
#[derive(Clone, Debug)]
pub struct ProblemInstance {
    total_slots: usize,
    slots_per_day: usize,
    num_venues: usize,
    num_lecturers: usize,
    num_cohorts: usize,
    num_courses: usize,
    atoms: Vec<SessionAtom>,
    lecturer_unavailable: SlotMask,
    venue_unavailable: SlotMask,
}

impl ProblemInstance {
    pub fn total_slots(&self) -> usize {
        self.total_slots
    }
    pub fn slots_per_day(&self) -> usize {
        self.slots_per_day
    }
    pub fn num_venues(&self) -> usize {
        self.num_venues
    }
    pub fn num_lecturers(&self) -> usize {
        self.num_lecturers
    }
    pub fn num_cohorts(&self) -> usize {
        self.num_cohorts
    }
    pub fn num_courses(&self) -> usize {
        self.num_courses
    }
    pub fn atoms(&self) -> &[SessionAtom] {
        &self.atoms
    }
    pub fn atom(&self, session: usize) -> &SessionAtom {
        &self.atoms[session]
    }
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    #[inline]
    pub fn lecturer_unavailable(&self, lecturer: LecturerIdx, slot: usize) -> bool {
        self.lecturer_unavailable.get(lecturer.get(), slot)
    }

    #[inline]
    pub fn venue_unavailable(&self, venue: VenueIdx, slot: usize) -> bool {
        self.venue_unavailable.get(venue.get(), slot)
    }

    /// A run of `duration` slots starting at `start` stays inside one day.
    #[inline]
    pub fn fits_in_day(&self, start: usize, duration: usize) -> bool {
        start + duration <= (start / self.slots_per_day + 1) * self.slots_per_day
            && start + duration <= self.total_slots
    }

    /// Every start a session of `duration` slots may use, ascending.
    pub fn day_valid_starts(&self, duration: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.total_slots).filter(move |&s| self.fits_in_day(s, duration))
    }

    /// Session indices grouped by course, in ascending course index.
    pub fn course_sessions(&self) -> Vec<Vec<usize>> {
        let mut by_course = vec![Vec::new(); self.num_courses];
        for atom in &self.atoms {
            by_course[atom.course.get()].push(atom.session);
        }
        by_course
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("course has no lecturer")]
    NoLecturer,
    #[error("lecturer {0} is not part of this university")]
    UnknownLecturer(LecturerId),
    #[error("course has zero sessions per week")]
    NoSessions,
    #[error("course has zero duration")]
    ZeroDuration,
    #[error("duration of {duration} slots does not fit a day of {slots_per_day} slots")]
    LongerThanDay { duration: usize, slots_per_day: usize },
    #[error("no resolvable cohort")]
    NoCohorts,
    #[error("no resolvable venue")]
    NoVenues,
}

#[derive(Clone, Debug)]
pub struct BuiltProblem {
    pub instance: ProblemInstance,
    pub skipped: Vec<SkippedCourse>,
}

fn group_rows<K, V>(rows: impl Iterator<Item = (K, V)>) -> HashMap<K, Vec<V>>
where
    K: Eq + std::hash::Hash,
    V: PartialEq,
{
    let mut grouped: HashMap<K, Vec<V>> = HashMap::new();
    for (k, v) in rows {
        let list = grouped.entry(k).or_default();
        if !list.contains(&v) {
            list.push(v);
        }
    }
    grouped
}

/// Turns one university's rows into the indexed problem. Courses that
/// cannot be resolved are skipped and reported, never placed half-formed.
pub fn build_problem(snapshot: &Snapshot, indexer: &Indexer, grid: &TimeGrid) -> BuiltProblem {
    let slots_per_day = grid.slots_per_day();
    let total_slots = grid.total_slots();

    let venues_by_course: HashMap<CourseId, Vec<VenueId>> = group_rows(
        snapshot
            .course_venues
            .iter()
            .map(|r| (r.course_id, r.venue_id)),
    );
    let cohorts_by_course: HashMap<CourseId, Vec<CohortId>> = group_rows(
        snapshot
            .course_cohorts
            .iter()
            .map(|r| (r.course_id, r.cohort_id)),
    );

    let mut atoms: Vec<SessionAtom> = Vec::new();
    let mut skipped: Vec<SkippedCourse> = Vec::new();
    let mut seen: HashSet<CourseId> = HashSet::new();

    for course in &snapshot.courses {
        if !seen.insert(course.id) {
            continue;
        }
        let Some(course_idx) = indexer.course(&course.id) else {
            continue;
        };

        let resolved = (|| {
            let lecturer_id = course.lecturer_id.ok_or(SkipReason::NoLecturer)?;
            let lecturer = indexer
                .lecturer(&lecturer_id)
                .ok_or(SkipReason::UnknownLecturer(lecturer_id))?;
            if course.sessions_per_week == 0 {
                return Err(SkipReason::NoSessions);
            }
            let duration = course.duration as usize;
            if duration == 0 {
                return Err(SkipReason::ZeroDuration);
            }
            if duration > slots_per_day {
                return Err(SkipReason::LongerThanDay {
                    duration,
                    slots_per_day,
                });
            }

            let mut cohorts = Vec::new();
            for id in cohorts_by_course.get(&course.id).into_iter().flatten() {
                match indexer.cohort(id) {
                    Some(c) => cohorts.push(c),
                    None => {
                        warn!(course = %course.id, cohort = %id, "cohort not found, dropping it")
                    }
                }
            }
            if cohorts.is_empty() {
                return Err(SkipReason::NoCohorts);
            }

            let mut venues = Vec::new();
            for id in venues_by_course.get(&course.id).into_iter().flatten() {
                match indexer.venue(id) {
                    Some(v) => venues.push(v),
                    None => warn!(course = %course.id, venue = %id, "venue not found, dropping it"),
                }
            }
            if venues.is_empty() {
                return Err(SkipReason::NoVenues);
            }
            Ok((lecturer, duration, cohorts, venues))
        })();

        let (lecturer, duration, cohorts, venues) = match resolved {
            Ok(parts) => parts,
            Err(reason) => {
                warn!(course = %course.id, code = %course.code, %reason, "skipping course");
                skipped.push(SkippedCourse {
                    course_id: course.id,
                    reason: reason.to_string(),
                });
                continue;
            }
        };

        let cohorts: Box<[CohortIdx]> = cohorts.into_boxed_slice();
        let venues: Box<[VenueIdx]> = venues.into_boxed_slice();
        for _ in 0..course.sessions_per_week {
            atoms.push(SessionAtom {
                session: atoms.len(),
                course: course_idx,
                lecturer,
                cohorts: cohorts.clone(),
                venues: venues.clone(),
                duration,
            });
        }
    }

    let mut lecturer_unavailable = SlotMask::new(indexer.lecturers().len(), total_slots);
    for row in &snapshot.lecturer_unavailability {
        let Some(l) = indexer.lecturer(&row.lecturer_id) else {
            debug!(lecturer = %row.lecturer_id, "unavailability for unknown lecturer");
            continue;
        };
        match grid.slot_range(&row.day, &row.start_time, &row.end_time) {
            Some(range) => lecturer_unavailable.mark(l.get(), range),
            None => debug!(
                lecturer = %row.lecturer_id,
                day = %row.day,
                start = %row.start_time,
                end = %row.end_time,
                "discarding lecturer unavailability row"
            ),
        }
    }

    let mut venue_unavailable = SlotMask::new(indexer.venues().len(), total_slots);
    for row in &snapshot.venue_unavailability {
        let Some(v) = indexer.venue(&row.venue_id) else {
            debug!(venue = %row.venue_id, "unavailability for unknown venue");
            continue;
        };
        match grid.slot_range(&row.day, &row.start_time, &row.end_time) {
            Some(range) => venue_unavailable.mark(v.get(), range),
            None => debug!(
                venue = %row.venue_id,
                day = %row.day,
                start = %row.start_time,
                end = %row.end_time,
                "discarding venue unavailability row"
            ),
        }
    }

    let instance = ProblemInstance {
        total_slots,
        slots_per_day,
        num_venues: indexer.venues().len(),
        num_lecturers: indexer.lecturers().len(),
        num_cohorts: indexer.cohorts().len(),
        num_courses: indexer.courses().len(),
        atoms,
        lecturer_unavailable,
        venue_unavailable,
    };
    info!(
        atoms = instance.atoms.len(),
        courses = instance.num_courses,
        skipped = skipped.len(),
        total_slots,
        "problem built"
    );
    BuiltProblem { instance, skipped }
}
