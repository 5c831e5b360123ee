mod config;
mod source;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use jobs::{InMemStore, TimetableService, WeekView};
use sched_core::{Snapshot, UniversityId};
use solver_heur::GaSolver;
use std::sync::Arc;
use types::CohortId;
use uuid::Uuid;

use config::{Cli, Command, SolveArgs};
use source::JsonFileSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    match Cli::parse().command {
        Command::Schema => {
            let schema = schemars::schema_for!(Snapshot);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Solve(args) => solve(args).await?,
    }
    Ok(())
}

async fn solve(args: SolveArgs) -> anyhow::Result<()> {
    let source = JsonFileSource::new(&args.input);
    let university = source
        .load()
        .await?
        .university_id
        .unwrap_or(UniversityId(Uuid::nil()));

    let service = TimetableService::new(source, Arc::new(InMemStore::new()), GaSolver::new());
    let result = service
        .generate(university, &args.start, &args.end, args.params())
        .await?;

    let json = serde_json::to_string_pretty(&result)?;
    match &args.output {
        Some(path) => tokio::fs::write(path, json)
            .await
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }

    if let Some(cohort) = args.cohort {
        match service.cohort_timetable(university, CohortId(cohort)).await? {
            Some(view) => print_week(&view),
            None => eprintln!("cohort {cohort} has no sessions"),
        }
    }
    Ok(())
}

fn print_week(view: &WeekView) {
    for day in &view.days {
        let cells: Vec<String> = day
            .slots
            .iter()
            .map(|s| {
                if s.is_free() {
                    format!("{} -", s.time)
                } else {
                    format!("{} {} @ {}", s.time, s.course_title, s.venue_name)
                }
            })
            .collect();
        println!("{:<10} {}", day.day.name(), cells.join(" | "));
    }
}
