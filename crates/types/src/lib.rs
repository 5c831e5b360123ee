use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash, PartialOrd,
            Ord,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}
id_newtype!(UniversityId);
id_newtype!(LecturerId);
id_newtype!(VenueId);
id_newtype!(CohortId);
id_newtype!(CourseId);

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    pub const WEEKDAYS: [DayOfWeek; 5] = [
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
    ];

    /// Accepts full ("Monday") or short ("mon") names, any case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let day = match lower.as_str() {
            "mon" | "monday" => DayOfWeek::Mon,
            "tue" | "tues" | "tuesday" => DayOfWeek::Tue,
            "wed" | "wednesday" => DayOfWeek::Wed,
            "thu" | "thur" | "thurs" | "thursday" => DayOfWeek::Thu,
            "fri" | "friday" => DayOfWeek::Fri,
            "sat" | "saturday" => DayOfWeek::Sat,
            "sun" | "sunday" => DayOfWeek::Sun,
            _ => return None,
        };
        Some(day)
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Mon => "Monday",
            DayOfWeek::Tue => "Tuesday",
            DayOfWeek::Wed => "Wednesday",
            DayOfWeek::Thu => "Thursday",
            DayOfWeek::Fri => "Friday",
            DayOfWeek::Sat => "Saturday",
            DayOfWeek::Sun => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lecturer_id: Option<LecturerId>,
    pub sessions_per_week: u32,
    /// Length of one session in grid slots.
    pub duration: u32,
    #[serde(default)]
    pub credit_unit: u32,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub semester: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lecturer {
    pub id: LecturerId,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: VenueId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub capacity: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
    pub id: CohortId,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CourseVenue {
    pub course_id: CourseId,
    pub venue_id: VenueId,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CourseCohort {
    pub course_id: CourseId,
    pub cohort_id: CohortId,
}

/// A calendar block during which a lecturer cannot teach.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LecturerUnavailability {
    pub lecturer_id: LecturerId,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A calendar block during which a venue cannot be booked.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueUnavailability {
    pub venue_id: VenueId,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Everything the engine reads for one university.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub university_id: Option<UniversityId>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub course_venues: Vec<CourseVenue>,
    #[serde(default)]
    pub course_cohorts: Vec<CourseCohort>,
    #[serde(default)]
    pub lecturers: Vec<Lecturer>,
    #[serde(default)]
    pub venues: Vec<Venue>,
    #[serde(default)]
    pub cohorts: Vec<Cohort>,
    #[serde(default)]
    pub lecturer_unavailability: Vec<LecturerUnavailability>,
    #[serde(default)]
    pub venue_unavailability: Vec<VenueUnavailability>,
}

fn default_population() -> usize {
    100
}
fn default_generations() -> usize {
    100
}
fn default_sample_width() -> usize {
    5
}
fn default_elite_fraction() -> f64 {
    0.1
}
fn default_mutation_rate() -> f64 {
    0.05
}
fn default_directed_share() -> f64 {
    0.7
}
fn default_seed() -> u64 {
    50
}
fn default_parallel() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GaParams {
    #[serde(default = "default_population")]
    pub population_size: usize,
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Construction picks uniformly among the first `sample_width` feasible pairs.
    #[serde(default = "default_sample_width")]
    pub sample_width: usize,
    #[serde(default = "default_elite_fraction")]
    pub elite_fraction: f64,
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Share of mutations that re-place via least-bad search instead of at random.
    #[serde(default = "default_directed_share")]
    pub directed_share: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for GaParams {
    fn default() -> Self {
        Self {
            population_size: default_population(),
            generations: default_generations(),
            sample_width: default_sample_width(),
            elite_fraction: default_elite_fraction(),
            mutation_rate: default_mutation_rate(),
            directed_share: default_directed_share(),
            seed: default_seed(),
            parallel: default_parallel(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub snapshot: Snapshot,
    pub start_of_day: String,
    pub end_of_day: String,
    #[serde(default)]
    pub params: GaParams,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSession {
    pub session_index: usize,
    pub course_id: CourseId,
    pub venue_id: VenueId,
    pub lecturer_id: LecturerId,
    pub cohort_ids: Vec<CohortId>,
    pub day: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub duration: u32,
    pub conflict: bool,
    pub score: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCourse {
    pub course_id: CourseId,
    pub reason: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimetableResult {
    pub status: String,
    pub fitness: f64,
    pub start_of_day: String,
    pub end_of_day: String,
    pub sessions: Vec<ScheduledSession>,
    #[serde(default)]
    pub skipped: Vec<SkippedCourse>,
    pub stats: serde_json::Value,
}

impl TimetableResult {
    pub const SOLVED: &'static str = "solved";
    pub const NOTHING_TO_SCHEDULE: &'static str = "nothing_to_schedule";

    pub fn is_solved(&self) -> bool {
        self.status == Self::SOLVED
    }
}
