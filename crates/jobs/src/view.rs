use schemars::JsonSchema;
use sched_core::{ConfigError, Snapshot, TimeGrid, TimetableResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use types::{CohortId, CourseId, DayOfWeek, VenueId};

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotEntry {
    pub time: String,
    pub course_id: Option<CourseId>,
    pub venue_id: Option<VenueId>,
    pub session_index: Option<usize>,
    pub course_title: String,
    pub venue_name: String,
}

impl SlotEntry {
    pub fn is_free(&self) -> bool {
        self.course_id.is_none()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub day: DayOfWeek,
    pub slots: Vec<SlotEntry>,
}

/// One cohort's week: every grid day, every slot, free ones included.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub cohort_id: CohortId,
    pub start_of_day: String,
    pub end_of_day: String,
    pub days: Vec<DayView>,
}

/// Lays out the sessions `cohort` attends. A session spanning several slots
/// fills all of them. `None` when the cohort attends nothing.
pub fn week_view(
    cohort: CohortId,
    result: &TimetableResult,
    snapshot: &Snapshot,
) -> Result<Option<WeekView>, ConfigError> {
    let grid = TimeGrid::weekly(&result.start_of_day, &result.end_of_day)?;
    let titles: HashMap<CourseId, &str> = snapshot
        .courses
        .iter()
        .map(|c| (c.id, c.title.as_str()))
        .collect();
    let venue_names: HashMap<VenueId, &str> = snapshot
        .venues
        .iter()
        .map(|v| (v.id, v.name.as_str()))
        .collect();

    let labels = grid.slot_labels();
    let mut cells: Vec<SlotEntry> = (0..grid.total_slots())
        .map(|g| SlotEntry {
            time: labels[g % labels.len()].clone(),
            ..Default::default()
        })
        .collect();

    let mut attended = 0usize;
    for s in result.sessions.iter().filter(|s| s.cohort_ids.contains(&cohort)) {
        attended += 1;
        let Some(range) = grid.slot_range(s.day.name(), &s.start_time, &s.end_time) else {
            debug!(
                session = s.session_index,
                day = %s.day,
                start = %s.start_time,
                "session outside the grid"
            );
            continue;
        };
        for g in range {
            let cell = &mut cells[g];
            if !cell.is_free() {
                debug!(
                    session = s.session_index,
                    slot = %cell.time,
                    "cohort double booked, keeping first session"
                );
                continue;
            }
            cell.course_id = Some(s.course_id);
            cell.venue_id = Some(s.venue_id);
            cell.session_index = Some(s.session_index);
            cell.course_title = titles.get(&s.course_id).copied().unwrap_or_default().to_string();
            cell.venue_name = venue_names.get(&s.venue_id).copied().unwrap_or_default().to_string();
        }
    }
    if attended == 0 {
        return Ok(None);
    }

    let per_day = grid.slots_per_day();
    let days = grid
        .days()
        .iter()
        .zip(cells.chunks(per_day))
        .map(|(day, slots)| DayView {
            day: *day,
            slots: slots.to_vec(),
        })
        .collect();

    Ok(Some(WeekView {
        cohort_id: cohort,
        start_of_day: result.start_of_day.clone(),
        end_of_day: result.end_of_day.clone(),
        days,
    }))
}
