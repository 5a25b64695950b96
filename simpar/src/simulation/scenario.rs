//! Build fully-initialized simulation runs from configuration
//!
//! A `Scenario` is the runtime bundle for one run. It owns:
//! - engine settings (`Engine`)
//! - the validated run parameters (`RunParameters`)
//! - particle state (`ParticleStore`) and the grid (`SpatialGrid`)
//! - system totals and the force law
//!
//! Every phase borrows what it needs from here; nothing is global.

use log::{debug, info};

use crate::configuration::config::RunConfig;
use crate::error::Result;
use crate::report::Report;
use crate::simulation::aggregate::{aggregate_initial, system_center_of_mass, CellBuckets};
use crate::simulation::engine::Engine;
use crate::simulation::forces::GridGravity;
use crate::simulation::grid::SpatialGrid;
use crate::simulation::initializer::initialize;
use crate::simulation::integrator::grid_step;
use crate::simulation::params::RunParameters;
use crate::simulation::states::{NVec2, ParticleStore, SystemTotals};

pub struct Scenario {
    pub engine: Engine,
    pub parameters: RunParameters,
    pub particles: ParticleStore,
    pub grid: SpatialGrid,
    pub totals: SystemTotals,
    pub forces: GridGravity,
    buckets: CellBuckets,
    completed: u64, // iterations run so far
}

impl Scenario {
    /// Allocate storage, seed the particles and run the initial aggregation
    pub fn build(parameters: RunParameters, engine: Engine) -> Result<Self> {
        let mut particles = initialize(parameters.seed, parameters.grid_side, parameters.particles)?;
        let mut grid = SpatialGrid::new(parameters.grid_side)?;
        let mut buckets = CellBuckets::new(parameters.cell_count(), parameters.particles)?;

        let total_mass = aggregate_initial(&mut particles, &mut grid, &mut buckets);
        debug!("total mass {total_mass:e}");

        Ok(Self {
            engine,
            parameters,
            particles,
            grid,
            totals: SystemTotals::new(total_mass),
            forces: GridGravity::default(),
            buckets,
            completed: 0,
        })
    }

    pub fn build_scenario(cfg: RunConfig) -> Result<Self> {
        let (parameters, engine) = cfg.into_parts()?;
        Self::build(parameters, engine)
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Advance one iteration. The system center of mass is taken after the
    /// last configured iteration.
    pub fn step(&mut self) {
        grid_step(
            &mut self.particles,
            &mut self.grid,
            &mut self.buckets,
            &self.forces,
            self.engine.reaggregation,
        );
        self.completed += 1;

        if self.completed == self.parameters.iterations {
            self.totals.center_of_mass = Some(system_center_of_mass(&self.particles, self.totals.total_mass));
        }
    }

    /// Run the remaining iterations and produce the report
    pub fn run(&mut self) -> Report {
        while self.completed < self.parameters.iterations {
            self.step();
            debug!("iteration {}/{} done", self.completed, self.parameters.iterations);
        }
        // only unset when a zero-iteration run was built by hand
        let center_of_mass = match self.totals.center_of_mass {
            Some(c) => c,
            None => *self
                .totals
                .center_of_mass
                .insert(system_center_of_mass(&self.particles, self.totals.total_mass)),
        };
        self.final_report(center_of_mass)
    }

    /// The report, available once the final iteration has run
    pub fn report(&self) -> Option<Report> {
        self.totals.center_of_mass.map(|c| self.final_report(c))
    }

    fn final_report(&self, center_of_mass: NVec2) -> Report {
        let particle0 = self.particles.get(0).map(|p| p.x).unwrap_or_else(NVec2::zeros);
        Report { particle0, center_of_mass }
    }
}

/// Build and run a scenario on the configured worker pool
pub fn simulate(parameters: RunParameters, engine: Engine) -> Result<Report> {
    info!(
        "seed {} grid {}x{} particles {} iterations {} ({:?})",
        parameters.seed,
        parameters.grid_side,
        parameters.grid_side,
        parameters.particles,
        parameters.iterations,
        engine.reaggregation,
    );

    let job = move || -> Result<Report> {
        let mut scenario = Scenario::build(parameters, engine)?;
        Ok(scenario.run())
    };

    match engine.threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            info!("running on {} worker threads", pool.current_num_threads());
            pool.install(job)
        }
        None => job(),
    }
}
