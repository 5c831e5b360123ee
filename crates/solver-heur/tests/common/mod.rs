#![allow(dead_code)]

#[path = "../../src/fixtures.rs"]
mod fixtures;

pub use fixtures::Scenario;
use types::GaParams;

pub fn small_params(seed: u64) -> GaParams {
    GaParams {
        population_size: 12,
        generations: 8,
        seed,
        ..GaParams::default()
    }
}
