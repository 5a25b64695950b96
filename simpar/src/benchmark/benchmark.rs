use std::time::Instant;

use crate::error::Result;
use crate::simulation::engine::{Engine, Reaggregation};
use crate::simulation::params::RunParameters;
use crate::simulation::scenario::Scenario;

/// Time one grid step over a range of particle counts and both policies.
/// Paste output directly into a spreadsheet to graph
pub fn bench_step_curve() -> Result<()> {
    let grid_side = 64;

    println!("particles,grid_side,two_phase_ms,running_ms");

    for n in (20_000..=400_000).step_by(20_000) {
        // Small n: average over a few steps to smooth noise
        let steps = if n <= 100_000 { 10 } else { 3 };

        let two_phase = ms_per_step(n, grid_side, steps, Reaggregation::TwoPhase)?;
        let running = ms_per_step(n, grid_side, steps, Reaggregation::Running)?;

        println!("{},{},{:.6},{:.6}", n, grid_side, two_phase, running);
    }
    Ok(())
}

fn ms_per_step(particles: usize, grid_side: usize, steps: u64, reaggregation: Reaggregation) -> Result<f64> {
    let parameters = RunParameters {
        seed: 42,
        grid_side,
        particles,
        iterations: steps + 1,
    };
    let engine = Engine { threads: None, reaggregation };
    let mut scenario = Scenario::build(parameters, engine)?;

    // Warm-up
    scenario.step();

    let t0 = Instant::now();
    for _ in 0..steps {
        scenario.step();
    }
    Ok(t0.elapsed().as_secs_f64() * 1000.0 / steps as f64)
}
