pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod error;
pub mod report;

pub use simulation::states::{Particle, ParticleStore, SystemTotals, NVec2};
pub use simulation::grid::{Cell, SpatialGrid};
pub use simulation::forces::{CellPull, GridGravity, NeighborWindow, Axis};
pub use simulation::aggregate::{aggregate_initial, reaggregate, system_center_of_mass, CellBuckets};
pub use simulation::integrator::{grid_step, kick_drift, wrap_unit};
pub use simulation::initializer::initialize;
pub use simulation::params::{RunParameters, G, EPSILON};
pub use simulation::engine::{Engine, Reaggregation};
pub use simulation::scenario::{simulate, Scenario};

pub use configuration::config::{RunConfig, RunSection, EngineConfig};

pub use error::{Result, SimError};
pub use report::Report;

pub use benchmark::benchmark::bench_step_curve;
