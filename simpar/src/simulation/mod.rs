pub mod states;
pub mod params;
pub mod engine;
pub mod grid;
pub mod initializer;
pub mod aggregate;
pub mod forces;
pub mod integrator;
pub mod scenario;
