use sched_core::grid::parse_time_of_day;
use sched_core::{build_problem, Indexer, ProblemInstance, TimeGrid};
use types::{
    Cohort, CohortId, Course, CourseCohort, CourseId, CourseVenue, DayOfWeek, Lecturer,
    LecturerId, LecturerUnavailability, Snapshot, Venue, VenueId, VenueUnavailability,
};
use uuid::Uuid;

/// Small hand-built universities for tests; entities are addressed by
/// their position.
#[derive(Debug)]
pub struct Scenario {
    pub snapshot: Snapshot,
    lecturers: Vec<LecturerId>,
    venues: Vec<VenueId>,
    cohorts: Vec<CohortId>,
}

impl Scenario {
    pub fn new(lecturers: usize, venues: usize, cohorts: usize) -> Self {
        let lecturers: Vec<LecturerId> =
            (0..lecturers).map(|_| LecturerId(Uuid::new_v4())).collect();
        let venues: Vec<VenueId> = (0..venues).map(|_| VenueId(Uuid::new_v4())).collect();
        let cohorts: Vec<CohortId> = (0..cohorts).map(|_| CohortId(Uuid::new_v4())).collect();
        let snapshot = Snapshot {
            lecturers: lecturers
                .iter()
                .enumerate()
                .map(|(i, id)| Lecturer { id: *id, name: format!("L{i}") })
                .collect(),
            venues: venues
                .iter()
                .enumerate()
                .map(|(i, id)| Venue { id: *id, name: format!("V{i}"), capacity: 50 })
                .collect(),
            cohorts: cohorts
                .iter()
                .enumerate()
                .map(|(i, id)| Cohort { id: *id, name: format!("C{i}") })
                .collect(),
            ..Default::default()
        };
        Self {
            snapshot,
            lecturers,
            venues,
            cohorts,
        }
    }

    pub fn course(
        &mut self,
        lecturer: usize,
        venues: &[usize],
        cohorts: &[usize],
        sessions: u32,
        duration: u32,
    ) -> CourseId {
        let id = CourseId(Uuid::new_v4());
        let n = self.snapshot.courses.len();
        self.snapshot.courses.push(Course {
            id,
            code: format!("CRS{n}"),
            title: format!("Course {n}"),
            lecturer_id: Some(self.lecturers[lecturer]),
            sessions_per_week: sessions,
            duration,
            credit_unit: 2,
            level: 100,
            semester: "first".into(),
        });
        for &v in venues {
            self.snapshot.course_venues.push(CourseVenue {
                course_id: id,
                venue_id: self.venues[v],
            });
        }
        for &c in cohorts {
            self.snapshot.course_cohorts.push(CourseCohort {
                course_id: id,
                cohort_id: self.cohorts[c],
            });
        }
        id
    }

    pub fn lecturer_off(&mut self, lecturer: usize, day: &str, start: &str, end: &str) {
        self.snapshot.lecturer_unavailability.push(LecturerUnavailability {
            lecturer_id: self.lecturers[lecturer],
            day: day.into(),
            start_time: start.into(),
            end_time: end.into(),
            reason: None,
        });
    }

    pub fn venue_off(&mut self, venue: usize, day: &str, start: &str, end: &str) {
        self.snapshot.venue_unavailability.push(VenueUnavailability {
            venue_id: self.venues[venue],
            day: day.into(),
            start_time: start.into(),
            end_time: end.into(),
            reason: None,
        });
    }

    pub fn grid(start: &str, end: &str, days: &[DayOfWeek]) -> TimeGrid {
        TimeGrid::new(
            parse_time_of_day(start).unwrap(),
            parse_time_of_day(end).unwrap(),
            TimeGrid::DEFAULT_SLOT_MINUTES,
            days.to_vec(),
        )
        .unwrap()
    }

    pub fn build_on(&self, grid: TimeGrid) -> (Indexer, TimeGrid, ProblemInstance) {
        let indexer = Indexer::from_snapshot(&self.snapshot);
        let built = build_problem(&self.snapshot, &indexer, &grid);
        (indexer, grid, built.instance)
    }
}
