use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use sched_core::{Candidate, GaParams, Placement, ProblemInstance};
use tracing::debug;

use crate::construct::build_candidate;
use crate::occupancy::Occupancy;
use crate::search::{least_bad_pair, pair_cost};

/// Draws `k` members with replacement and keeps the fittest, first drawn on ties.
pub fn tournament<'a, R: Rng + ?Sized>(
    population: &'a [Candidate],
    k: usize,
    rng: &mut R,
) -> &'a Candidate {
    let mut best = &population[rng.gen_range(0..population.len())];
    for _ in 1..k.max(1) {
        let challenger = &population[rng.gen_range(0..population.len())];
        if challenger.fitness > best.fitness {
            best = challenger;
        }
    }
    best
}

fn restricted_score(
    problem: &ProblemInstance,
    occ: &Occupancy,
    sessions: &[usize],
    parent: &Candidate,
) -> f64 {
    sessions
        .iter()
        .map(|&s| {
            let p = &parent.placements[s];
            pair_cost(problem, problem.atom(s), occ, p.slot, p.venue).score()
        })
        .sum()
}

/// Per-course recombination. Courses are taken in ascending index; for each,
/// the parent whose sessions clash less with what the child already holds
/// donates all of that course's placements (the second parent on ties).
pub fn crossover(
    problem: &ProblemInstance,
    course_sessions: &[Vec<usize>],
    first: &Candidate,
    second: &Candidate,
) -> (Vec<Placement>, Occupancy) {
    let mut occ = Occupancy::new(problem);
    let mut child = first.placements.clone();

    for sessions in course_sessions.iter().filter(|s| !s.is_empty()) {
        let donor = if restricted_score(problem, &occ, sessions, first)
            < restricted_score(problem, &occ, sessions, second)
        {
            first
        } else {
            second
        };

        for &s in sessions {
            let atom = problem.atom(s);
            let p = &donor.placements[s];
            let cost = pair_cost(problem, atom, &occ, p.slot, p.venue);
            child[s] = Placement {
                conflict: !cost.is_free(),
                score: cost.score(),
                ..p.clone()
            };
            occ.occupy(atom, p.slot, p.venue);
        }
    }
    (child, occ)
}

/// Re-places every flagged placement at its least-bad pair against the
/// child's full occupancy. Placements are moved, never dropped.
pub fn repair(problem: &ProblemInstance, child: &mut [Placement], occ: &mut Occupancy) {
    for p in child.iter_mut().filter(|p| p.conflict) {
        let atom = problem.atom(p.session);
        occ.release(atom, p.slot, p.venue);
        let pair = least_bad_pair(problem, atom, occ);
        p.slot = pair.slot;
        p.venue = pair.venue;
        p.score = pair.score();
        p.conflict = !pair.cost.is_free();
        occ.occupy(atom, p.slot, p.venue);
    }
}

/// Uniform over all starts that keep a `duration`-slot session inside a day.
fn random_day_valid_start<R: Rng + ?Sized>(
    problem: &ProblemInstance,
    duration: usize,
    rng: &mut R,
) -> usize {
    let per_day = problem.slots_per_day();
    let starts_per_day = per_day + 1 - duration;
    let days = problem.total_slots() / per_day;
    let pick = rng.gen_range(0..days * starts_per_day);
    (pick / starts_per_day) * per_day + pick % starts_per_day
}

pub fn mutate<R: Rng + ?Sized>(
    problem: &ProblemInstance,
    child: &mut [Placement],
    occ: &mut Occupancy,
    rate: f64,
    directed_share: f64,
    rng: &mut R,
) {
    for p in child.iter_mut() {
        if rng.gen::<f64>() >= rate {
            continue;
        }
        let atom = problem.atom(p.session);
        occ.release(atom, p.slot, p.venue);

        if rng.gen::<f64>() < directed_share {
            let pair = least_bad_pair(problem, atom, occ);
            p.slot = pair.slot;
            p.venue = pair.venue;
            p.score = pair.score();
            p.conflict = !pair.cost.is_free();
        } else {
            p.slot = random_day_valid_start(problem, atom.duration(), rng);
            p.venue = atom.venues()[rng.gen_range(0..atom.venues().len())];
            p.score = pair_cost(problem, atom, occ, p.slot, p.venue).score();
            p.conflict = true;
        }
        occ.occupy(atom, p.slot, p.venue);
    }
}

/// Fittest first. Stable, so equal fitness keeps population order.
pub fn sort_population(population: &mut [Candidate]) {
    population.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
}

pub fn elite_count(population: usize, fraction: f64) -> usize {
    ((population as f64 * fraction) as usize).max(1).min(population)
}

fn best_fitness(population: &[Candidate]) -> f64 {
    population
        .iter()
        .map(|c| c.fitness)
        .fold(f64::NEG_INFINITY, f64::max)
}

#[derive(Clone, Debug)]
pub struct Evolution {
    pub best: Candidate,
    /// Best fitness of the initial population, then of every generation.
    pub history: Vec<f64>,
}

pub struct Engine<'a> {
    problem: &'a ProblemInstance,
    params: &'a GaParams,
    course_sessions: Vec<Vec<usize>>,
}

impl<'a> Engine<'a> {
    pub fn new(problem: &'a ProblemInstance, params: &'a GaParams) -> Self {
        Self {
            problem,
            params,
            course_sessions: problem.course_sessions(),
        }
    }

    /// One candidate per seed, in seed order, in parallel unless disabled.
    fn per_seed<F>(&self, seeds: Vec<u64>, f: F) -> Vec<Candidate>
    where
        F: Fn(u64) -> Candidate + Send + Sync,
    {
        if self.params.parallel {
            seeds.into_par_iter().map(f).collect()
        } else {
            seeds.into_iter().map(f).collect()
        }
    }

    pub fn initial_population(&self, rng: &mut ChaCha8Rng) -> Vec<Candidate> {
        let seeds: Vec<u64> = (0..self.params.population_size).map(|_| rng.gen()).collect();
        self.per_seed(seeds, |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            build_candidate(self.problem, &mut rng, self.params.sample_width).0
        })
    }

    pub fn offspring(
        &self,
        population: &[Candidate],
        tournament_size: usize,
        seed: u64,
    ) -> Candidate {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let first = tournament(population, tournament_size, &mut rng);
        let second = tournament(population, tournament_size, &mut rng);

        let (mut placements, mut occ) =
            crossover(self.problem, &self.course_sessions, first, second);
        repair(self.problem, &mut placements, &mut occ);
        mutate(
            self.problem,
            &mut placements,
            &mut occ,
            self.params.mutation_rate,
            self.params.directed_share,
            &mut rng,
        );
        Candidate::new(placements)
    }

    /// Elites survive unchanged; the rest are bred from the sorted population.
    pub fn next_generation(
        &self,
        mut population: Vec<Candidate>,
        rng: &mut ChaCha8Rng,
    ) -> Vec<Candidate> {
        sort_population(&mut population);
        let elite = elite_count(population.len(), self.params.elite_fraction);
        let seeds: Vec<u64> = (elite..population.len()).map(|_| rng.gen()).collect();

        let children = self.per_seed(seeds, |seed| self.offspring(&population, elite, seed));
        population.truncate(elite);
        population.extend(children);
        population
    }

    pub fn evolve(&self) -> Evolution {
        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let mut population = self.initial_population(&mut rng);
        let mut history = Vec::with_capacity(self.params.generations + 1);
        history.push(best_fitness(&population));

        for generation in 0..self.params.generations {
            population = self.next_generation(population, &mut rng);
            let best = best_fitness(&population);
            history.push(best);
            debug!(generation, best_fitness = best, "generation done");
        }

        sort_population(&mut population);
        Evolution {
            best: population.swap_remove(0),
            history,
        }
    }
}
