use clap::{Args, Parser, Subcommand};
use sched_core::GaParams;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "unischedule", about = "Weekly university timetable generation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a timetable from a JSON snapshot
    Solve(SolveArgs),
    /// Print the JSON schema of the snapshot file
    Schema,
}

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Snapshot of one university's courses, venues, cohorts and calendars
    #[arg(long, value_name = "FILE")]
    pub input: PathBuf,

    #[arg(long, default_value = "08:00", env = "UNISCHEDULE__DAY__START")]
    pub start: String,

    #[arg(long, default_value = "17:00", env = "UNISCHEDULE__DAY__END")]
    pub end: String,

    #[arg(long, env = "UNISCHEDULE__GA__SEED")]
    pub seed: Option<u64>,

    #[arg(long, env = "UNISCHEDULE__GA__POPULATION")]
    pub population: Option<usize>,

    #[arg(long, env = "UNISCHEDULE__GA__GENERATIONS")]
    pub generations: Option<usize>,

    /// Build candidates one at a time instead of on the thread pool
    #[arg(long)]
    pub sequential: bool,

    /// Write the result here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also print this cohort's week
    #[arg(long, value_name = "UUID")]
    pub cohort: Option<Uuid>,
}

impl SolveArgs {
    pub fn params(&self) -> GaParams {
        let defaults = GaParams::default();
        GaParams {
            population_size: self.population.unwrap_or(defaults.population_size),
            generations: self.generations.unwrap_or(defaults.generations),
            seed: self.seed.unwrap_or(defaults.seed),
            parallel: !self.sequential,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve_args(argv: &[&str]) -> SolveArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Solve(args) => args,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn flags_override_engine_defaults() {
        let args = solve_args(&[
            "unischedule", "solve", "--input", "uni.json", "--seed", "7", "--population", "30",
            "--sequential", "--start", "07:30",
        ]);
        assert_eq!(args.start, "07:30");
        let params = args.params();
        assert_eq!(params.seed, 7);
        assert_eq!(params.population_size, 30);
        assert_eq!(params.generations, GaParams::default().generations);
        assert!(!params.parallel);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["unischedule", "solve"]).is_err());
        assert!(matches!(
            Cli::try_parse_from(["unischedule", "schema"]).unwrap().command,
            Command::Schema
        ));
    }
}
