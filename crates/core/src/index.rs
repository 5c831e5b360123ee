use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::warn;
use types::{CohortId, CourseId, LecturerId, Snapshot, VenueId};

macro_rules! dense_index {
    ($name:ident) => {
        /// Dense position in one [`Indexer`] table. Only the indexer mints these,
        /// so a value is always below the table length it came from.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            #[inline]
            pub fn get(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}
dense_index!(LecturerIdx);
dense_index!(VenueIdx);
dense_index!(CohortIdx);
dense_index!(CourseIdx);

#[derive(Clone, Debug)]
pub struct IndexTable<K> {
    ids: Vec<K>,
    by_id: HashMap<K, usize>,
}

impl<K: Copy + Eq + Hash + fmt::Display> IndexTable<K> {
    fn build(kind: &str, ids: impl IntoIterator<Item = K>) -> Self {
        let mut table = Self {
            ids: Vec::new(),
            by_id: HashMap::new(),
        };
        for id in ids {
            if table.by_id.contains_key(&id) {
                warn!(kind, %id, "duplicate id in snapshot, keeping the first");
                continue;
            }
            table.by_id.insert(id, table.ids.len());
            table.ids.push(id);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    fn position(&self, id: &K) -> Option<usize> {
        self.by_id.get(id).copied()
    }
}

/// Maps external ids to dense indices, one table per entity kind.
/// Built once per run and never mutated.
#[derive(Clone, Debug)]
pub struct Indexer {
    lecturers: IndexTable<LecturerId>,
    venues: IndexTable<VenueId>,
    cohorts: IndexTable<CohortId>,
    courses: IndexTable<CourseId>,
}

impl Indexer {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            lecturers: IndexTable::build("lecturer", snapshot.lecturers.iter().map(|l| l.id)),
            venues: IndexTable::build("venue", snapshot.venues.iter().map(|v| v.id)),
            cohorts: IndexTable::build("cohort", snapshot.cohorts.iter().map(|c| c.id)),
            courses: IndexTable::build("course", snapshot.courses.iter().map(|c| c.id)),
        }
    }

    pub fn lecturers(&self) -> &IndexTable<LecturerId> {
        &self.lecturers
    }
    pub fn venues(&self) -> &IndexTable<VenueId> {
        &self.venues
    }
    pub fn cohorts(&self) -> &IndexTable<CohortId> {
        &self.cohorts
    }
    pub fn courses(&self) -> &IndexTable<CourseId> {
        &self.courses
    }

    pub fn lecturer(&self, id: &LecturerId) -> Option<LecturerIdx> {
        self.lecturers.position(id).map(LecturerIdx)
    }
    pub fn venue(&self, id: &VenueId) -> Option<VenueIdx> {
        self.venues.position(id).map(VenueIdx)
    }
    pub fn cohort(&self, id: &CohortId) -> Option<CohortIdx> {
        self.cohorts.position(id).map(CohortIdx)
    }
    pub fn course(&self, id: &CourseId) -> Option<CourseIdx> {
        self.courses.position(id).map(CourseIdx)
    }

    pub fn lecturer_id(&self, idx: LecturerIdx) -> LecturerId {
        self.lecturers.ids[idx.0]
    }
    pub fn venue_id(&self, idx: VenueIdx) -> VenueId {
        self.venues.ids[idx.0]
    }
    pub fn cohort_id(&self, idx: CohortIdx) -> CohortId {
        self.cohorts.ids[idx.0]
    }
    pub fn course_id(&self, idx: CourseIdx) -> CourseId {
        self.courses.ids[idx.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Lecturer, Venue};
    use uuid::Uuid;

    #[test]
    fn assigns_dense_indices_in_snapshot_order() {
        let a = LecturerId(Uuid::new_v4());
        let b = LecturerId(Uuid::new_v4());
        let v = VenueId(Uuid::new_v4());
        let snap = Snapshot {
            lecturers: vec![
                Lecturer { id: a, name: "A".into() },
                Lecturer { id: b, name: "B".into() },
                Lecturer { id: a, name: "A again".into() },
            ],
            venues: vec![Venue { id: v, name: "Hall".into(), capacity: 80 }],
            ..Default::default()
        };
        let ix = Indexer::from_snapshot(&snap);

        assert_eq!(ix.lecturers().len(), 2);
        assert_eq!(ix.lecturer(&a).map(LecturerIdx::get), Some(0));
        assert_eq!(ix.lecturer(&b).map(LecturerIdx::get), Some(1));
        assert_eq!(ix.lecturer_id(ix.lecturer(&b).unwrap()), b);
        assert_eq!(ix.venue(&v).map(VenueIdx::get), Some(0));
        assert!(ix.cohorts().is_empty());
        assert_eq!(ix.cohort(&CohortId(Uuid::new_v4())), None);
    }
}
