use crate::index::{CourseIdx, VenueIdx};

/// Where one session atom ended up. `score` is the weighted cost of the
/// pair at the moment it was placed; `conflict` marks a placement that
/// breaks a booking or calendar constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub session: usize,
    pub course: CourseIdx,
    pub venue: VenueIdx,
    pub slot: usize,
    pub conflict: bool,
    pub score: f64,
}

/// A complete timetable: exactly one placement per session atom, indexed by
/// session.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub placements: Vec<Placement>,
    pub fitness: f64,
}

pub fn fitness_of(total_score: f64) -> f64 {
    1.0 / (1.0 + total_score)
}

impl Candidate {
    pub fn new(placements: Vec<Placement>) -> Self {
        let mut c = Self {
            placements,
            fitness: 0.0,
        };
        c.evaluate();
        c
    }

    pub fn total_score(&self) -> f64 {
        self.placements.iter().map(|p| p.score).sum()
    }

    /// Recomputes `fitness` from the placement scores and returns the total score.
    pub fn evaluate(&mut self) -> f64 {
        let total = self.total_score();
        self.fitness = fitness_of(total);
        total
    }

    pub fn conflicts(&self) -> usize {
        self.placements.iter().filter(|p| p.conflict).count()
    }
}
